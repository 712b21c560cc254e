//! Trade records and the payload returned from an admission call.

use crate::ids::{MatchId, OrderId, Price, Quantity, UserId};
use crate::types::OrderStatus;

/// One maker/taker fill. `price` is always the maker's resting price:
/// price-improvement accrues to the taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub maker_id: UserId,
    pub taker_id: UserId,
    pub match_id: MatchId,
    pub order_id: OrderId,
    pub qty: Quantity,
    pub price: Price,
}

/// Result of a successful `AddLimit`/`AddMarket` call.
///
/// `order_id` is the taker's id across every trade produced by this call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPayload {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub immediate_trades: Vec<Trade>,
    pub remaining_qty: Quantity,
}
