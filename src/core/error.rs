use thiserror::Error;

/// Per-item failure kinds inside the reconciliation loop. All of these are
/// recoverable: the engine counts the item as failed and moves on. Only the
/// initial catalog / own-orders fetches are allowed to abort a whole run.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("no ingame sell offers in the order book")]
    NoLiquidity,

    #[error("item \"{0}\" not found upstream")]
    NotFound(String),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
