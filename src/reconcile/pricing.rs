use crate::core::error::TradeError;
use crate::core::types::{OrderBookEntry, OrderKind, Platinum, SellerStatus};

/// Competitive position for a deep book: the 4th-cheapest listing. A
/// deliberate undercut slot, not the absolute minimum, so we do not race the
/// book to the bottom.
const UNDERCUT_INDEX: usize = 3;

/// Prices of listings that actually compete with a new sell order: sellers
/// who are in game, sell side only. Ascending.
pub fn ingame_sell_prices(book: &[OrderBookEntry]) -> Vec<Platinum> {
    let mut prices: Vec<Platinum> = book
        .iter()
        .filter(|entry| entry.status == SellerStatus::Ingame && entry.kind == OrderKind::Sell)
        .map(|entry| entry.platinum)
        .collect();
    prices.sort_unstable();
    prices
}

/// Target sale price for one item's order book.
///
/// Books with fewer than five competing listings price at the middle element
/// (`len / 2`, the lower middle for even counts); deeper books price at the
/// 4th-cheapest listing. An empty filtered book is `NoLiquidity`.
pub fn compute_price(book: &[OrderBookEntry]) -> Result<Platinum, TradeError> {
    let prices = ingame_sell_prices(book);
    if prices.is_empty() {
        return Err(TradeError::NoLiquidity);
    }

    let index = if prices.len() < 5 {
        prices.len() / 2
    } else {
        UNDERCUT_INDEX
    };
    Ok(prices[index])
}
