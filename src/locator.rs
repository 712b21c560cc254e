//! The order-id index: an O(1) locator from `OrderId` to where that order
//! rests, so `Cancel` never has to scan a book side.

use std::collections::HashMap;

use crate::ids::{OrderId, Price};
use crate::types::OrderSide;

/// Locates a resting order: which side, which price level, and which slot
/// within that level's FIFO.
///
/// A `Handle` remains valid across unrelated insertions and deletions in
/// other levels, or other orders within the same level, because `Level`'s
/// FIFO is slot-stable (see `level.rs`). It is invalidated only when the
/// order it names is itself removed, at which point the index entry is
/// removed too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub side: OrderSide,
    pub price: Price,
    pub slot: usize,
}

/// Maps every currently-resting `OrderId` to its `Handle`.
///
/// Invariant I3: contains exactly the orders currently resting on either
/// book side; exhausted and rejected orders are never present.
pub type OrderIdIndex = HashMap<OrderId, Handle>;
