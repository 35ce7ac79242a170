use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub market: MarketCfg,
    #[serde(default)]
    pub trade: TradeCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(rename = "userAgent", default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(
        rename = "poolIdleTimeout",
        with = "humantime_serde",
        default = "default_pool_idle"
    )]
    pub pool_idle_timeout: Duration,
    #[serde(
        rename = "tcpKeepAlive",
        with = "humantime_serde",
        default = "default_keep_alive"
    )]
    pub tcp_keep_alive: Duration,
    #[serde(rename = "poolMaxIdlePerHost", default = "default_pool")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle(),
            tcp_keep_alive: default_keep_alive(),
            pool_max_idle_per_host: default_pool(),
        }
    }
}
fn default_ua() -> String {
    "wfm-trader/0.1".into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_pool_idle() -> Duration {
    Duration::from_secs(90)
}
fn default_keep_alive() -> Duration {
    Duration::from_secs(60)
}
fn default_pool() -> usize {
    16
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketCfg {
    /// v2 API root: catalog, order books, order mutations.
    #[serde(rename = "baseUrl", default = "default_base_url")]
    pub base_url: String,
    /// v1 API root; only the signin endpoint lives there.
    #[serde(rename = "authUrl", default = "default_auth_url")]
    pub auth_url: String,
    #[serde(rename = "orderLimit", default = "default_order_limit")]
    pub order_limit: u32,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "deviceId", default = "default_device_id")]
    pub device_id: String,
}

impl Default for MarketCfg {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            order_limit: default_order_limit(),
            email: "".to_string(),
            password: "".to_string(),
            device_id: default_device_id(),
        }
    }
}
fn default_base_url() -> String {
    "https://api.warframe.market/v2".to_string()
}
fn default_auth_url() -> String {
    "https://api.warframe.market/v1".to_string()
}
fn default_order_limit() -> u32 {
    100
}
fn default_device_id() -> String {
    "wfm-trader".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TradeCfg {
    /// Minimum gap between successive order mutations.
    #[serde(
        rename = "mutationSpacing",
        with = "humantime_serde",
        default = "default_spacing"
    )]
    pub mutation_spacing: Duration,
    #[serde(rename = "lookupTopN", default = "default_top_n")]
    pub lookup_top_n: usize,
}

impl Default for TradeCfg {
    fn default() -> Self {
        Self {
            mutation_spacing: default_spacing(),
            lookup_top_n: default_top_n(),
        }
    }
}
fn default_spacing() -> Duration {
    Duration::from_millis(500)
}
fn default_top_n() -> usize {
    5
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.market.base_url.is_empty(), "market.baseUrl missing");
        anyhow::ensure!(!self.market.auth_url.is_empty(), "market.authUrl missing");
        anyhow::ensure!(self.market.order_limit > 0, "market.orderLimit must be > 0");
        anyhow::ensure!(
            !self.trade.mutation_spacing.is_zero(),
            "trade.mutationSpacing must be positive"
        );
        anyhow::ensure!(self.trade.lookup_top_n > 0, "trade.lookupTopN must be > 0");
        Ok(())
    }
}
