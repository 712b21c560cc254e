//! Debug-only verification of the book's structural invariants.
//!
//! Invoked after every mutation in debug builds; compiled out entirely in
//! release builds, where the contract is assumed rather than checked. A
//! violation is a programming error in the engine itself, not a caller
//! error, so it is fatal.

use std::collections::BTreeMap;

use crate::ids::Price;
use crate::level::Level;

/// I1: each level's `aggregate_qty` equals the sum of its orders' `qty`.
/// I2: no level has an empty FIFO.
/// I4: no order has zero quantity while resting.
pub fn verify_side(side: &BTreeMap<Price, Level>) {
    for (price, level) in side {
        debug_assert!(
            !level.is_empty(),
            "empty level left resting at price {price}"
        );

        let summed: u64 = level.iter().map(|o| o.qty.0).sum();
        debug_assert_eq!(
            summed, level.aggregate_qty.0,
            "aggregate_qty mismatch at price {price}: cached {} vs summed {}",
            level.aggregate_qty.0, summed
        );

        for order in level.iter() {
            debug_assert!(
                !order.qty.is_zero(),
                "zero-quantity order {:?} resting at price {price}",
                order.id
            );
        }

        let mut prev_id: Option<u64> = None;
        for order in level.iter() {
            if let Some(prev) = prev_id {
                debug_assert!(
                    prev < order.id.0,
                    "FIFO order violated at price {price}: {prev} before {}",
                    order.id.0
                );
            }
            prev_id = Some(order.id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{OrderId, Quantity, UserId};
    use crate::order::Order;
    use crate::types::{OrderSide, TimeInForce};

    fn order(id: u64, qty: u64) -> Order {
        Order {
            id: OrderId(id),
            creator: UserId(0),
            side: OrderSide::Buy,
            qty: Quantity(qty),
            price: Some(Price(10)),
            tif: Some(TimeInForce::GTC),
        }
    }

    #[test]
    fn passes_on_a_well_formed_side() {
        let mut side: BTreeMap<Price, Level> = BTreeMap::new();
        let mut level = Level::new();
        level.push_back(order(0, 5));
        level.push_back(order(1, 5));
        side.insert(Price(10), level);
        verify_side(&side);
    }

    #[test]
    #[should_panic(expected = "empty level")]
    fn panics_on_empty_level() {
        let mut side: BTreeMap<Price, Level> = BTreeMap::new();
        side.insert(Price(10), Level::new());
        verify_side(&side);
    }
}
