mod config;
mod core;
mod import;
mod market;
mod matcher;
mod reconcile;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use config::config::AppCfg;
use import::{aggregate, read_want_file};
use market::client::{MarketData, OrderExecutor};
use market::warframe::WarframeMarketClient;
use matcher::rank::top_matches;
use reconcile::engine::Reconciler;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "wfm-trader",
    version,
    about = "warframe.market sell-order automation"
)]
struct Cli {
    /// Re-price all existing sell orders against their live order books
    #[arg(long)]
    update: bool,

    /// Import a want-list file and create/update sell orders from it
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Show the closest catalog matches for a query, then exit
    #[arg(long, value_name = "QUERY")]
    lookup: Option<String>,

    /// Config file path
    #[arg(long, default_value = "config.yml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let cfg = AppCfg::load(&cli.config)?;

    let client = reqwest::Client::builder()
        .user_agent(cfg.http.user_agent.clone())
        .pool_idle_timeout(cfg.http.pool_idle_timeout)
        .pool_max_idle_per_host(cfg.http.pool_max_idle_per_host)
        .tcp_keepalive(cfg.http.tcp_keep_alive)
        .timeout(cfg.http.timeout)
        .build()
        .context("building http client")?;

    let mut wm = WarframeMarketClient::new(cfg.market.clone(), client);

    // Lookup is read-only and needs no login.
    if let Some(query) = cli.lookup.as_deref() {
        let catalog = wm.fetch_catalog().await.context("fetching item catalog")?;
        let matches = top_matches(query, &catalog, cfg.trade.lookup_top_n);
        if matches.is_empty() {
            warn!("no matches for {query:?}");
        } else {
            println!("{}", report::render_matches(&matches));
        }
        return Ok(());
    }

    if !cli.update && cli.import.is_none() {
        anyhow::bail!("nothing to do: pass --update, --import <FILE> or --lookup <QUERY>");
    }

    wm.login().await.context("authenticating")?;

    // Resolve the want list up front; catalog and want-file problems should
    // surface before we touch any order.
    let want = match cli.import.as_deref() {
        Some(path) => {
            let catalog = wm.fetch_catalog().await.context("fetching item catalog")?;
            let lines = read_want_file(path)?;
            let want = aggregate(&lines, &catalog);
            info!(
                "resolved {} want-list lines to {} distinct items",
                lines.len(),
                want.len()
            );
            Some(want)
        }
        None => None,
    };

    let my_orders = wm
        .fetch_my_orders()
        .await
        .context("fetching existing orders")?;
    info!("found {} existing orders", my_orders.len());

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, stopping after the current item");
                shutdown.cancel();
            }
        });
    }

    let engine = Reconciler::new(wm, cfg.trade.mutation_spacing, shutdown);

    if cli.update {
        let summary = engine.update_all_prices(&my_orders).await;
        println!("{}", report::render_summary(&summary));
    }

    if let Some(want) = want {
        // An update pass just rewrote prices; work from fresh orders.
        let current = if cli.update {
            engine
                .fetch_my_orders()
                .await
                .context("refreshing existing orders")?
        } else {
            my_orders
        };
        let summary = engine.reconcile(&want, &current).await;
        println!("{}", report::render_summary(&summary));
    }

    Ok(())
}
