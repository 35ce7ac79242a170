use crate::config::config::MarketCfg;
use crate::core::types::{
    ExistingOrder, OrderBookEntry, OrderKind, Platinum, ReconciliationAction, SellerStatus,
};
use crate::market::client::{MarketData, OrderExecutor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

// ---- v2 API response envelopes ----

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    data: Vec<ItemRow>,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    data: ItemBody,
}

#[derive(Debug, Deserialize)]
struct ItemBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BookResponse {
    data: Vec<RawBookOrder>,
}

#[derive(Debug, Deserialize)]
struct RawBookOrder {
    #[serde(rename = "type")]
    kind: OrderKind,
    platinum: Platinum,
    user: RawBookUser,
}

#[derive(Debug, Deserialize)]
struct RawBookUser {
    status: SellerStatus,
}

#[derive(Debug, Deserialize)]
struct MyOrdersResponse {
    data: Vec<RawMyOrder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMyOrder {
    id: String,
    item_id: String,
    quantity: u32,
    platinum: Platinum,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody<'a> {
    item_id: &'a str,
    platinum: Platinum,
    quantity: u32,
    visible: bool,
    #[serde(rename = "type")]
    kind: OrderKind,
}

#[derive(Debug, Serialize)]
struct UpdateOrderBody {
    platinum: Platinum,
    quantity: u32,
}

/// warframe.market client. Catalog, item and order-book reads go through the
/// v2 API unauthenticated; own-order reads and mutations carry the JWT
/// obtained from the v1 signin endpoint.
pub struct WarframeMarketClient {
    client: Client,
    cfg: MarketCfg,
    jwt: Option<String>,
}

impl WarframeMarketClient {
    pub fn new(cfg: MarketCfg, client: Client) -> Self {
        Self {
            client,
            cfg,
            jwt: None,
        }
    }

    /// Signs in and stores the JWT handed back in the `Authorization`
    /// response header (`Bearer <token>`).
    pub async fn login(&mut self) -> Result<()> {
        anyhow::ensure!(
            !self.cfg.email.is_empty() && !self.cfg.password.is_empty(),
            "market.email and market.password are required (set MARKET__EMAIL / MARKET__PASSWORD)"
        );

        let body = serde_json::json!({
            "auth_type": "header",
            "email": self.cfg.email,
            "password": self.cfg.password,
            "device_id": self.cfg.device_id,
        });

        let resp = self
            .client
            .post(format!("{}/auth/signin", self.cfg.auth_url))
            .json(&body)
            .send()
            .await
            .context("requesting signin")?
            .error_for_status()
            .context("signin rejected")?;

        let header = resp
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| anyhow::anyhow!("signin response missing Authorization header"))?;
        let token = header
            .to_str()
            .context("reading Authorization header")?
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| anyhow::anyhow!("malformed Authorization header"))?
            .to_string();

        self.jwt = Some(token);
        info!("authenticated with warframe.market");
        Ok(())
    }

    fn bearer(&self) -> Result<String> {
        self.jwt
            .as_ref()
            .map(|t| format!("Bearer {t}"))
            .ok_or_else(|| anyhow::anyhow!("not authenticated, call login() first"))
    }

    async fn fetch_items(&self) -> Result<Vec<ItemRow>> {
        let resp: ItemsResponse = self
            .client
            .get(format!("{}/items", self.cfg.base_url))
            .send()
            .await
            .context("requesting item catalog")?
            .error_for_status()
            .context("received non-success status for item catalog")?
            .json()
            .await
            .context("parsing item catalog")?;
        Ok(resp.data)
    }
}

#[async_trait]
impl MarketData for WarframeMarketClient {
    async fn fetch_catalog(&self) -> Result<Vec<String>> {
        let items = self.fetch_items().await?;
        Ok(items.into_iter().map(|item| item.slug).collect())
    }

    async fn resolve_item_id(&self, slug: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(format!("{}/item/{}", self.cfg.base_url, slug))
            .send()
            .await
            .with_context(|| format!("requesting item {slug}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: ItemResponse = resp
            .error_for_status()
            .with_context(|| format!("received non-success status for item {slug}"))?
            .json()
            .await
            .with_context(|| format!("parsing item {slug}"))?;
        Ok(Some(body.data.id))
    }

    async fn item_slug(&self, item_id: &str) -> Result<Option<String>> {
        let items = self.fetch_items().await?;
        Ok(items
            .into_iter()
            .find(|item| item.id == item_id)
            .map(|item| item.slug))
    }

    async fn fetch_order_book(&self, item_id: &str) -> Result<Vec<OrderBookEntry>> {
        let resp: BookResponse = self
            .client
            .get(format!("{}/orders/item/{}", self.cfg.base_url, item_id))
            .query(&[("limit", self.cfg.order_limit)])
            .send()
            .await
            .with_context(|| format!("requesting order book for {item_id}"))?
            .error_for_status()
            .with_context(|| format!("received non-success status for order book {item_id}"))?
            .json()
            .await
            .with_context(|| format!("parsing order book for {item_id}"))?;

        Ok(resp
            .data
            .into_iter()
            .map(|raw| OrderBookEntry {
                status: raw.user.status,
                kind: raw.kind,
                platinum: raw.platinum,
            })
            .collect())
    }
}

#[async_trait]
impl OrderExecutor for WarframeMarketClient {
    async fn fetch_my_orders(&self) -> Result<Vec<ExistingOrder>> {
        let resp: MyOrdersResponse = self
            .client
            .get(format!("{}/orders/my", self.cfg.base_url))
            .header(AUTHORIZATION, self.bearer()?)
            .send()
            .await
            .context("requesting own orders")?
            .error_for_status()
            .context("received non-success status for own orders")?
            .json()
            .await
            .context("parsing own orders")?;

        let mut orders: Vec<ExistingOrder> = resp
            .data
            .into_iter()
            .map(|raw| ExistingOrder {
                id: raw.id,
                item_id: raw.item_id,
                quantity: raw.quantity,
                platinum: raw.platinum,
            })
            .collect();
        // Most valuable orders first, matching the site's own listing.
        orders.sort_by(|a, b| b.platinum.cmp(&a.platinum));
        Ok(orders)
    }

    async fn create_order(&self, action: &ReconciliationAction) -> Result<()> {
        let body = CreateOrderBody {
            item_id: &action.item_id,
            platinum: action.platinum,
            quantity: action.quantity,
            visible: action.visible,
            kind: OrderKind::Sell,
        };

        self.client
            .post(format!("{}/order", self.cfg.base_url))
            .header(AUTHORIZATION, self.bearer()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("creating order for {}", action.item_id))?
            .error_for_status()
            .with_context(|| format!("order creation rejected for {}", action.item_id))?;
        Ok(())
    }

    async fn update_order(&self, action: &ReconciliationAction) -> Result<()> {
        let order_id = action
            .existing_order_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("update action without an order id"))?;

        let body = UpdateOrderBody {
            platinum: action.platinum,
            quantity: action.quantity,
        };

        self.client
            .patch(format!("{}/order/{}", self.cfg.base_url, order_id))
            .header(AUTHORIZATION, self.bearer()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("updating order {order_id}"))?
            .error_for_status()
            .with_context(|| format!("order update rejected for {order_id}"))?;
        Ok(())
    }
}
