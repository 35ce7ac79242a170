use crate::core::types::{ExistingOrder, OrderBookEntry, ReconciliationAction};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only marketplace data: the canonical catalog, slug/id resolution and
/// per-item order books.
#[async_trait]
pub trait MarketData: Send + Sync + 'static {
    /// Full catalog of canonical item slugs. Fetched once per run.
    async fn fetch_catalog(&self) -> Result<Vec<String>>;

    /// Resolves a canonical slug to its item id. `Ok(None)` means the slug no
    /// longer exists upstream.
    async fn resolve_item_id(&self, slug: &str) -> Result<Option<String>>;

    /// Reverse lookup, used for logging when we only hold an item id.
    async fn item_slug(&self, item_id: &str) -> Result<Option<String>>;

    /// Live order book snapshot for one item.
    async fn fetch_order_book(&self, item_id: &str) -> Result<Vec<OrderBookEntry>>;
}

/// Authenticated order mutations on the user's own account.
#[async_trait]
pub trait OrderExecutor: Send + Sync + 'static {
    async fn fetch_my_orders(&self) -> Result<Vec<ExistingOrder>>;

    async fn create_order(&self, action: &ReconciliationAction) -> Result<()>;

    async fn update_order(&self, action: &ReconciliationAction) -> Result<()>;
}
