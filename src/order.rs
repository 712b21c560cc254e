//! The per-order datum resting on, or passing through, the book.

use crate::ids::{OrderId, Price, Quantity, UserId};
use crate::types::{OrderSide, TimeInForce};

/// An order. `qty` is the *remaining* quantity: it monotonically decreases
/// as the order is matched, and the order is erased once it reaches zero.
///
/// Limit orders carry both `price` and `tif`; market orders carry neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub creator: UserId,
    pub side: OrderSide,
    pub qty: Quantity,
    pub price: Option<Price>,
    pub tif: Option<TimeInForce>,
}

impl Order {
    #[must_use]
    pub fn is_limit(&self) -> bool {
        self.price.is_some()
    }
}
