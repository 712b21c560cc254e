//! The order book itself: two price-indexed sides, the order-id index, and
//! the admission/matching/cancel entry points.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::events::{Event, EventLog, EventSink};
use crate::ids::{MatchId, OrderId, Price, Quantity, UserId};
use crate::invariants;
use crate::level::Level;
use crate::locator::{Handle, OrderIdIndex};
use crate::order::Order;
use crate::trade::{AddPayload, Trade};
use crate::types::{OrderSide, OrderStatus, RejectReason, TimeInForce};

type BookSide = BTreeMap<Price, Level>;

/// The matching engine. Single-threaded and synchronous: every method call
/// is a complete, serialized unit of work, and externally visible effects
/// happen in call order.
///
/// `S` is the event sink — an opaque, caller-owned destination for the
/// append-only command log (see `events.rs`). The engine never buffers,
/// flushes, or closes it.
pub struct OrderBook<S: EventSink> {
    bids: BookSide,
    asks: BookSide,
    index: OrderIdIndex,
    next_order_id: OrderId,
    next_match_id: MatchId,
    log: EventLog<S>,
}

struct MatchOutcome {
    trades: Vec<Trade>,
    unfilled_qty: Quantity,
    filled_all: bool,
}

impl<S: EventSink> OrderBook<S> {
    pub fn new(sink: S) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: OrderIdIndex::new(),
            next_order_id: OrderId(0),
            next_match_id: MatchId(0),
            log: EventLog::new(sink),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub fn depth_at(&self, side: OrderSide, price: Price) -> Quantity {
        let book_side = self.side(side);
        book_side.get(&price).map_or(Quantity::ZERO, |l| l.aggregate_qty)
    }

    pub fn event_seq(&self) -> u64 {
        self.log.event_seq()
    }

    fn side(&self, side: OrderSide) -> &BookSide {
        match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        }
    }

    fn opposite_best(&self, side: OrderSide) -> Option<Price> {
        match side {
            OrderSide::Buy => self.best_ask(),
            OrderSide::Sell => self.best_bid(),
        }
    }

    /// Admits a limit order. Rejects with `BadQty`/`BadPrice` before any
    /// state is touched or id consumed.
    pub fn add_limit(
        &mut self,
        user_id: UserId,
        side: OrderSide,
        price: Price,
        qty: Quantity,
        tif: TimeInForce,
    ) -> Result<AddPayload, RejectReason> {
        if qty.is_zero() {
            warn!(?user_id, "add_limit rejected: zero quantity");
            return Err(RejectReason::BadQty);
        }
        if !price.is_valid_limit() {
            warn!(?user_id, "add_limit rejected: zero price");
            return Err(RejectReason::BadPrice);
        }

        let order_id = self.next_order_id;
        self.next_order_id = self.next_order_id.next();

        let opposite_best = self.opposite_best(side);
        let crosses = match (side, opposite_best) {
            (_, None) => false,
            (OrderSide::Buy, Some(p)) => price >= p,
            (OrderSide::Sell, Some(p)) => price <= p,
        };

        debug!(?order_id, ?side, ?price, ?qty, ?tif, crosses, "add_limit");

        let (trades, remaining) = if crosses {
            let outcome = self.run_match(side, order_id, user_id, qty, Some(price), opposite_best.unwrap());
            (outcome.trades, outcome.unfilled_qty)
        } else {
            (Vec::new(), qty)
        };

        let (status, reported_remaining) = if remaining.is_zero() {
            (OrderStatus::ImmediateFill, Quantity::ZERO)
        } else {
            let status = if trades.is_empty() {
                OrderStatus::AwaitingFill
            } else {
                OrderStatus::PartialFill
            };
            match tif {
                TimeInForce::GTC => {
                    self.rest(order_id, user_id, side, price, remaining);
                    (status, remaining)
                }
                TimeInForce::IOC => (status, Quantity::ZERO),
            }
        };

        self.log.append_event(Event::AddLimit {
            user_id,
            side,
            qty,
            price,
            tif,
        });
        self.verify();

        Ok(AddPayload {
            order_id,
            status,
            immediate_trades: trades,
            remaining_qty: reported_remaining,
        })
    }

    /// Admits a market order. Rejects with `BadQty` or `EmptyBookForMarket`
    /// before any id is consumed.
    pub fn add_market(
        &mut self,
        user_id: UserId,
        side: OrderSide,
        qty: Quantity,
    ) -> Result<AddPayload, RejectReason> {
        if qty.is_zero() {
            warn!(?user_id, "add_market rejected: zero quantity");
            return Err(RejectReason::BadQty);
        }
        let Some(best) = self.opposite_best(side) else {
            warn!(?user_id, ?side, "add_market rejected: empty opposite book");
            return Err(RejectReason::EmptyBookForMarket);
        };

        let order_id = self.next_order_id;
        self.next_order_id = self.next_order_id.next();

        debug!(?order_id, ?side, ?qty, "add_market");

        let outcome = self.run_match(side, order_id, user_id, qty, None, best);
        let status = if outcome.filled_all {
            OrderStatus::ImmediateFill
        } else {
            OrderStatus::PartialFill
        };

        self.log
            .append_event(Event::AddMarket { user_id, side, qty });
        self.verify();

        Ok(AddPayload {
            order_id,
            status,
            immediate_trades: outcome.trades,
            remaining_qty: outcome.unfilled_qty,
        })
    }

    /// Cancels a resting order in O(1) via the order-id index. Unknown ids
    /// are a normal outcome (`false`), not an error.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some(handle) = self.index.remove(&order_id) else {
            return false;
        };
        let book_side = match handle.side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        };
        let level = book_side
            .get_mut(&handle.price)
            .expect("handle pointed at a level that no longer exists");
        level.remove(handle.slot);
        if level.is_empty() {
            book_side.remove(&handle.price);
        }

        debug!(?order_id, "cancel");
        self.log.append_event(Event::Cancel { order_id });
        self.verify();
        true
    }

    fn rest(&mut self, order_id: OrderId, user_id: UserId, side: OrderSide, price: Price, qty: Quantity) {
        let order = Order {
            id: order_id,
            creator: user_id,
            side,
            qty,
            price: Some(price),
            tif: Some(TimeInForce::GTC),
        };
        let book_side = match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        };
        let level = book_side.entry(price).or_insert_with(Level::new);
        let slot = level.push_back(order);
        self.index.insert(order_id, Handle { side, price, slot });
    }

    /// The crossing loop: walks the opposite side best-price-first,
    /// filling `unfilled_qty` against resting makers until either the
    /// taker is exhausted or no further price on the opposite side is
    /// acceptable.
    ///
    /// `limit_price` is `None` for a market taker (accepts any price) and
    /// `Some(price)` for a limit taker (stops once the next best opposite
    /// price is no longer at least as aggressive as `price`).
    fn run_match(
        &mut self,
        taker_side: OrderSide,
        taker_id: OrderId,
        taker_creator: UserId,
        mut unfilled_qty: Quantity,
        limit_price: Option<Price>,
        mut best_price: Price,
    ) -> MatchOutcome {
        let is_market = limit_price.is_none();
        let mut trades = Vec::new();

        loop {
            if unfilled_qty.is_zero() {
                break;
            }

            let opposite = match taker_side {
                OrderSide::Buy => &self.asks,
                OrderSide::Sell => &self.bids,
            };

            if !opposite.contains_key(&best_price) {
                let next_best = self.opposite_best(taker_side);
                let will_accept = match next_best {
                    None => false,
                    Some(p) => {
                        is_market
                            || match taker_side {
                                OrderSide::Buy => p <= limit_price.unwrap(),
                                OrderSide::Sell => p >= limit_price.unwrap(),
                            }
                    }
                };
                if !will_accept {
                    break;
                }
                best_price = next_best.unwrap();
                continue;
            }

            let opposite_mut = match taker_side {
                OrderSide::Buy => &mut self.asks,
                OrderSide::Sell => &mut self.bids,
            };
            let level = opposite_mut
                .get_mut(&best_price)
                .expect("checked via contains_key above");

            let slot = level.front_slot().expect("non-empty level has a front");
            let maker = level.front().expect("non-empty level has a front");
            let maker_order_id = maker.id;
            let maker_creator = maker.creator;
            let fill = maker.qty.min(unfilled_qty);

            trace!(?maker_order_id, ?fill, price = ?best_price, "fill");

            let exhausted = level.reduce(slot, fill);
            unfilled_qty -= fill;

            let match_id = self.next_match_id;
            self.next_match_id = self.next_match_id.next();

            trades.push(Trade {
                maker_id: maker_creator,
                taker_id: taker_creator,
                match_id,
                order_id: taker_id,
                qty: fill,
                price: best_price,
            });

            if exhausted {
                self.index.remove(&maker_order_id);
            }

            let level_now_empty = level.is_empty();
            if level_now_empty {
                opposite_mut.remove(&best_price);
            }
        }

        MatchOutcome {
            filled_all: unfilled_qty.is_zero(),
            unfilled_qty,
            trades,
        }
    }

    #[cfg(debug_assertions)]
    fn verify(&self) {
        invariants::verify_side(&self.bids);
        invariants::verify_side(&self.asks);
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            debug_assert!(bid < ask, "book crossed: best bid {bid} >= best ask {ask}");
        }
    }

    #[cfg(not(debug_assertions))]
    fn verify(&self) {}
}
