use serde::{Deserialize, Serialize};

/// Prices on warframe.market are whole platinum.
pub type Platinum = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Buy,
    Sell,
}

/// Seller presence as reported in the order book. Only `ingame` sellers are
/// considered priceable competition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    Ingame,
    Online,
    #[serde(other)]
    Offline,
}

/// One listing from an item's live order book. Ephemeral; fetched per item
/// and never retained across runs.
#[derive(Clone, Debug)]
pub struct OrderBookEntry {
    pub status: SellerStatus,
    pub kind: OrderKind,
    pub platinum: Platinum,
}

/// A sell order already placed on the user's account. Owned by the
/// marketplace; we only read it and propose mutations through the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistingOrder {
    pub id: String,
    pub item_id: String,
    pub quantity: u32,
    pub platinum: Platinum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
}

/// The engine's sole output: a create/update proposal handed to the order
/// mutation sink. `Update` always carries the existing order id, `Create`
/// never does; the constructors keep that invariant.
#[derive(Clone, Debug)]
pub struct ReconciliationAction {
    pub item_id: String,
    pub kind: ActionKind,
    pub quantity: u32,
    pub platinum: Platinum,
    pub existing_order_id: Option<String>,
    pub visible: bool,
}

impl ReconciliationAction {
    pub fn create(item_id: String, quantity: u32, platinum: Platinum) -> Self {
        Self {
            item_id,
            kind: ActionKind::Create,
            quantity,
            platinum,
            existing_order_id: None,
            visible: true,
        }
    }

    pub fn update(order_id: String, item_id: String, quantity: u32, platinum: Platinum) -> Self {
        Self {
            item_id,
            kind: ActionKind::Update,
            quantity,
            platinum,
            existing_order_id: Some(order_id),
            visible: true,
        }
    }
}

/// Per-item result for an action that was actually sent.
#[derive(Clone, Debug)]
pub struct ItemOutcome {
    pub name: String,
    pub kind: ActionKind,
    pub quantity: u32,
    pub platinum: Platinum,
}

/// Aggregate counters for one engine run. One item's failure never aborts
/// the run, so `failed` can be non-zero alongside successes.
#[derive(Clone, Debug, Default)]
pub struct ReconcileSummary {
    pub created: u32,
    pub updated: u32,
    pub failed: u32,
    pub outcomes: Vec<ItemOutcome>,
}

impl ReconcileSummary {
    pub fn success_count(&self) -> u32 {
        self.created + self.updated
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome.kind {
            ActionKind::Create => self.created += 1,
            ActionKind::Update => self.updated += 1,
        }
        self.outcomes.push(outcome);
    }
}
