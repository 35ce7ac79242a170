use crate::core::error::TradeError;
use crate::core::types::{
    ActionKind, ExistingOrder, ItemOutcome, ReconcileSummary, ReconciliationAction,
};
use crate::import::WantList;
use crate::market::client::{MarketData, OrderExecutor};
use crate::reconcile::pacer::Pacer;
use crate::reconcile::pricing::compute_price;
use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Sequential create/update engine. Items are processed one at a time with a
/// paced gap before every mutation; a single item's failure is counted and
/// the loop moves on. Cancellation stops before the next item, actions
/// already sent stand.
pub struct Reconciler<C> {
    client: C,
    pacer: Pacer,
    shutdown: CancellationToken,
}

impl<C> Reconciler<C>
where
    C: MarketData + OrderExecutor,
{
    pub fn new(client: C, mutation_spacing: Duration, shutdown: CancellationToken) -> Self {
        Self {
            client,
            pacer: Pacer::new(mutation_spacing),
            shutdown,
        }
    }

    pub async fn fetch_my_orders(&self) -> Result<Vec<ExistingOrder>> {
        self.client.fetch_my_orders().await
    }

    /// Merges an imported want list against the user's existing orders.
    ///
    /// Per item: resolve the slug to an item id, price its order book, then
    /// either update the existing order (quantities merge additively) or
    /// create a fresh visible sell order.
    pub async fn reconcile(
        &self,
        want: &WantList,
        my_orders: &[ExistingOrder],
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        info!("reconciling {} items", want.len());

        for (name, &quantity) in want.iter() {
            if self.shutdown.is_cancelled() {
                info!("shutdown requested, stopping; already-sent orders stand");
                break;
            }

            match self.reconcile_item(name, quantity, my_orders).await {
                Ok(outcome) => {
                    info!(
                        item = %outcome.name,
                        quantity = outcome.quantity,
                        platinum = outcome.platinum,
                        "{}",
                        match outcome.kind {
                            ActionKind::Create => "order created",
                            ActionKind::Update => "order updated",
                        }
                    );
                    summary.record(outcome);
                }
                Err(TradeError::NoLiquidity) => {
                    warn!(item = %name, "no ingame sell offers, skipping");
                    summary.failed += 1;
                }
                Err(TradeError::NotFound(slug)) => {
                    warn!(item = %slug, "not found upstream, skipping");
                    summary.failed += 1;
                }
                Err(TradeError::Transport(e)) => {
                    error!(item = %name, error = ?e, "failed to process item");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    async fn reconcile_item(
        &self,
        name: &str,
        quantity: u32,
        my_orders: &[ExistingOrder],
    ) -> Result<ItemOutcome, TradeError> {
        let item_id = self
            .client
            .resolve_item_id(name)
            .await?
            .ok_or_else(|| TradeError::NotFound(name.to_string()))?;

        let book = self.client.fetch_order_book(&item_id).await?;
        let platinum = compute_price(&book)?;

        let action = match my_orders.iter().find(|order| order.item_id == item_id) {
            Some(existing) => ReconciliationAction::update(
                existing.id.clone(),
                item_id,
                existing.quantity + quantity,
                platinum,
            ),
            None => ReconciliationAction::create(item_id, quantity, platinum),
        };

        self.pacer.until_ready().await;
        match action.kind {
            ActionKind::Create => self.client.create_order(&action).await?,
            ActionKind::Update => self.client.update_order(&action).await?,
        }

        Ok(ItemOutcome {
            name: name.to_string(),
            kind: action.kind,
            quantity: action.quantity,
            platinum: action.platinum,
        })
    }

    /// Re-prices every existing order against its current order book without
    /// touching quantities. Items with no ingame sell liquidity are skipped
    /// outright, not counted as failures.
    pub async fn update_all_prices(&self, my_orders: &[ExistingOrder]) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        info!("repricing {} existing orders", my_orders.len());

        for order in my_orders {
            if self.shutdown.is_cancelled() {
                info!("shutdown requested, stopping; already-sent orders stand");
                break;
            }

            let name = match self.client.item_slug(&order.item_id).await {
                Ok(Some(slug)) => slug,
                Ok(None) => order.item_id.clone(),
                Err(e) => {
                    error!(order = %order.id, error = ?e, "failed to look up item name");
                    summary.failed += 1;
                    continue;
                }
            };

            match self.reprice_order(order, &name).await {
                Ok(outcome) => {
                    info!(item = %outcome.name, platinum = outcome.platinum, "order repriced");
                    summary.record(outcome);
                }
                Err(TradeError::NoLiquidity) => {
                    warn!(item = %name, "no ingame sell offers, skipping");
                }
                Err(e) => {
                    error!(item = %name, error = %e, "failed to reprice order");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    async fn reprice_order(
        &self,
        order: &ExistingOrder,
        name: &str,
    ) -> Result<ItemOutcome, TradeError> {
        let book = self.client.fetch_order_book(&order.item_id).await?;
        let platinum = compute_price(&book)?;

        let action = ReconciliationAction::update(
            order.id.clone(),
            order.item_id.clone(),
            order.quantity,
            platinum,
        );

        self.pacer.until_ready().await;
        self.client.update_order(&action).await?;

        Ok(ItemOutcome {
            name: name.to_string(),
            kind: ActionKind::Update,
            quantity: order.quantity,
            platinum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{OrderBookEntry, OrderKind, Platinum, SellerStatus};
    use crate::import::aggregate;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn ingame_sell(platinum: Platinum) -> OrderBookEntry {
        OrderBookEntry {
            status: SellerStatus::Ingame,
            kind: OrderKind::Sell,
            platinum,
        }
    }

    #[derive(Default)]
    struct FakeMarket {
        // slug -> item id
        ids: HashMap<String, String>,
        // item id -> order book
        books: HashMap<String, Vec<OrderBookEntry>>,
        my_orders: Vec<ExistingOrder>,
        // item ids whose book fetch fails with a transport error
        broken_books: Vec<String>,
        sent: Mutex<Vec<ReconciliationAction>>,
    }

    impl FakeMarket {
        fn with_item(mut self, slug: &str, id: &str, book: Vec<OrderBookEntry>) -> Self {
            self.ids.insert(slug.to_string(), id.to_string());
            self.books.insert(id.to_string(), book);
            self
        }

        fn with_order(mut self, order: ExistingOrder) -> Self {
            self.my_orders.push(order);
            self
        }

        fn sent(&self) -> Vec<ReconciliationAction> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketData for Arc<FakeMarket> {
        async fn fetch_catalog(&self) -> Result<Vec<String>> {
            Ok(self.ids.keys().cloned().collect())
        }

        async fn resolve_item_id(&self, slug: &str) -> Result<Option<String>> {
            Ok(self.ids.get(slug).cloned())
        }

        async fn item_slug(&self, item_id: &str) -> Result<Option<String>> {
            Ok(self
                .ids
                .iter()
                .find(|(_, id)| id.as_str() == item_id)
                .map(|(slug, _)| slug.clone()))
        }

        async fn fetch_order_book(&self, item_id: &str) -> Result<Vec<OrderBookEntry>> {
            if self.broken_books.iter().any(|id| id == item_id) {
                return Err(anyhow!("connection reset"));
            }
            Ok(self.books.get(item_id).cloned().unwrap_or_default())
        }
    }

    #[async_trait]
    impl OrderExecutor for Arc<FakeMarket> {
        async fn fetch_my_orders(&self) -> Result<Vec<ExistingOrder>> {
            Ok(self.my_orders.clone())
        }

        async fn create_order(&self, action: &ReconciliationAction) -> Result<()> {
            self.sent.lock().unwrap().push(action.clone());
            Ok(())
        }

        async fn update_order(&self, action: &ReconciliationAction) -> Result<()> {
            self.sent.lock().unwrap().push(action.clone());
            Ok(())
        }
    }

    fn engine(market: Arc<FakeMarket>) -> Reconciler<Arc<FakeMarket>> {
        Reconciler::new(market, Duration::ZERO, CancellationToken::new())
    }

    fn want(lines: &[&str], catalog: &[&str]) -> WantList {
        let cat: Vec<String> = catalog.iter().map(|s| s.to_string()).collect();
        aggregate(lines.iter().copied(), &cat)
    }

    #[tokio::test]
    async fn merges_quantities_additively_into_existing_order() {
        let market = Arc::new(
            FakeMarket::default()
                .with_item("nekros_prime_set", "id-nek", vec![ingame_sell(50)])
                .with_order(ExistingOrder {
                    id: "ord-1".to_string(),
                    item_id: "id-nek".to_string(),
                    quantity: 2,
                    platinum: 60,
                }),
        );
        let my_orders = market.my_orders.clone();

        let want = want(
            &["nekros prime set", "nekros_prime_set", "nekros prime"],
            &["nekros_prime_set"],
        );
        assert_eq!(want.count("nekros_prime_set"), 3);

        let summary = engine(market.clone()).reconcile(&want, &my_orders).await;

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(summary.failed, 0);

        let sent = market.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, ActionKind::Update);
        assert_eq!(sent[0].quantity, 5); // 2 existing + 3 imported
        assert_eq!(sent[0].existing_order_id.as_deref(), Some("ord-1"));
    }

    #[tokio::test]
    async fn creates_visible_order_when_none_exists() {
        let book: Vec<_> = [10, 12, 15, 20, 25, 30].map(ingame_sell).into();
        let market = Arc::new(FakeMarket::default().with_item("octavia_prime_set", "id-oct", book));

        let want = want(&["octavia prime set"], &["octavia_prime_set"]);
        let summary = engine(market.clone()).reconcile(&want, &[]).await;

        assert_eq!(summary.created, 1);
        let sent = market.sent();
        assert_eq!(sent[0].kind, ActionKind::Create);
        assert_eq!(sent[0].quantity, 1);
        assert_eq!(sent[0].platinum, 20); // 4th cheapest of the deep book
        assert!(sent[0].visible);
        assert!(sent[0].existing_order_id.is_none());
    }

    #[tokio::test]
    async fn illiquid_item_fails_without_aborting_the_run() {
        let market = Arc::new(
            FakeMarket::default()
                .with_item("dead_item", "id-dead", vec![]) // nothing ingame+sell
                .with_item("live_item", "id-live", vec![ingame_sell(30)]),
        );

        let want = want(&["dead_item", "live_item"], &["dead_item", "live_item"]);
        let summary = engine(market.clone()).reconcile(&want, &[]).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.success_count(), 1);
        assert_eq!(market.sent().len(), 1);
        assert_eq!(market.sent()[0].item_id, "id-live");
    }

    #[tokio::test]
    async fn unresolvable_slug_counts_as_not_found() {
        // Catalog entry exists locally but the upstream lookup knows nothing.
        let market = Arc::new(FakeMarket::default());
        let mut list = WantList::new();
        list.add("ghost_item");

        let summary = engine(market.clone()).reconcile(&list, &[]).await;

        assert_eq!(summary.failed, 1);
        assert!(market.sent().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_skips_only_the_broken_item() {
        let mut fake = FakeMarket::default()
            .with_item("broken", "id-broken", vec![ingame_sell(10)])
            .with_item("fine", "id-fine", vec![ingame_sell(10)]);
        fake.broken_books.push("id-broken".to_string());
        let market = Arc::new(fake);

        let want = want(&["broken", "fine"], &["broken", "fine"]);
        let summary = engine(market.clone()).reconcile(&want, &[]).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(market.sent().len(), 1);
    }

    #[tokio::test]
    async fn repricing_keeps_quantities_and_skips_illiquid_orders() {
        let market = Arc::new(
            FakeMarket::default()
                .with_item("liquid", "id-liq", vec![ingame_sell(10), ingame_sell(20), ingame_sell(30)])
                .with_item("illiquid", "id-ill", vec![])
                .with_order(ExistingOrder {
                    id: "ord-1".to_string(),
                    item_id: "id-liq".to_string(),
                    quantity: 4,
                    platinum: 99,
                })
                .with_order(ExistingOrder {
                    id: "ord-2".to_string(),
                    item_id: "id-ill".to_string(),
                    quantity: 1,
                    platinum: 12,
                }),
        );
        let my_orders = market.my_orders.clone();

        let summary = engine(market.clone()).update_all_prices(&my_orders).await;

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0); // illiquid order is skipped, not failed
        let sent = market.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, ActionKind::Update);
        assert_eq!(sent[0].quantity, 4); // unchanged
        assert_eq!(sent[0].platinum, 20); // middle of the shallow book
        assert_eq!(summary.outcomes[0].name, "liquid");
    }

    #[tokio::test]
    async fn repeat_runs_compute_the_same_price_and_kind() {
        let book: Vec<_> = [10, 12, 15, 20, 25, 30].map(ingame_sell).into();
        let market = Arc::new(FakeMarket::default().with_item("item", "id-1", book));

        let want = want(&["item"], &["item"]);
        let eng = engine(market.clone());

        let first = eng.reconcile(&want, &[]).await;
        let second = eng.reconcile(&want, &[]).await;

        assert_eq!(first.outcomes[0].platinum, second.outcomes[0].platinum);
        assert_eq!(first.outcomes[0].kind, second.outcomes[0].kind);
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_any_mutation() {
        let market = Arc::new(FakeMarket::default().with_item(
            "item",
            "id-1",
            vec![ingame_sell(10)],
        ));
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let eng = Reconciler::new(market.clone(), Duration::ZERO, shutdown);

        let want = want(&["item"], &["item"]);
        let summary = eng.reconcile(&want, &[]).await;

        assert_eq!(summary.success_count(), 0);
        assert_eq!(summary.failed, 0);
        assert!(market.sent().is_empty());
    }
}
