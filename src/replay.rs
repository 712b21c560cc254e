//! Replays a previously logged event stream into a fresh `OrderBook`,
//! reproducing the same terminal state (same resting orders, same ids
//! consumed) as the original run.
//!
//! This is the inverse of `events::Event::render`: each line is
//! `<seq> <verb> <args...>`, the sequence number is discarded (the engine
//! regenerates its own), and the verb dispatches to the matching admission
//! call.

use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

use crate::book::OrderBook;
use crate::events::EventSink;
use crate::ids::{OrderId, Price, Quantity, UserId};
use crate::types::{OrderSide, TimeInForce};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("line {line_no}: empty line")]
    EmptyLine { line_no: usize },
    #[error("line {line_no}: missing sequence number")]
    MissingSeq { line_no: usize },
    #[error("line {line_no}: unknown verb `{verb}`")]
    UnknownVerb { line_no: usize, verb: String },
    #[error("line {line_no}: malformed `{verb}` arguments")]
    MalformedArgs { line_no: usize, verb: String },
}

/// Reads every line from `reader` and replays it into `book`.
///
/// Stops at the first malformed line; everything replayed before that
/// point remains applied (there is no rollback — a log is assumed to be
/// either trustworthy or truncated, never internally corrupt).
pub fn replay_into<R: BufRead, S: EventSink>(
    reader: R,
    book: &mut OrderBook<S>,
) -> Result<u64, ReplayError> {
    let mut applied = 0u64;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|_| ReplayError::MalformedArgs {
            line_no,
            verb: "<io>".to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        replay_line(&line, line_no, book)?;
        applied += 1;
    }
    debug!(applied, "replay complete");
    Ok(applied)
}

fn replay_line<S: EventSink>(
    line: &str,
    line_no: usize,
    book: &mut OrderBook<S>,
) -> Result<(), ReplayError> {
    let mut fields = line.split_whitespace();
    fields
        .next()
        .ok_or(ReplayError::EmptyLine { line_no })?
        .parse::<u64>()
        .map_err(|_| ReplayError::MissingSeq { line_no })?;

    let verb = fields
        .next()
        .ok_or(ReplayError::EmptyLine { line_no })?
        .to_string();

    let rest: Vec<&str> = fields.collect();
    let malformed = || ReplayError::MalformedArgs {
        line_no,
        verb: verb.clone(),
    };

    match verb.as_str() {
        "ADDLIMIT" => {
            let [user_id, side, qty, price, tif] = <[&str; 5]>::try_from(rest)
                .map_err(|_| ReplayError::MalformedArgs {
                    line_no,
                    verb: verb.clone(),
                })?;
            let user_id = UserId(user_id.parse().map_err(|_| malformed())?);
            let side: OrderSide = side.parse().map_err(|_| malformed())?;
            let qty = Quantity(qty.parse().map_err(|_| malformed())?);
            let price = Price(price.parse().map_err(|_| malformed())?);
            let tif: TimeInForce = tif.parse().map_err(|_| malformed())?;
            // A logged event was accepted when it was written; a replay
            // rejection would mean the log and the engine disagree.
            let _ = book.add_limit(user_id, side, price, qty, tif);
            Ok(())
        }
        "ADDMARKET" => {
            let [user_id, side, qty] = <[&str; 3]>::try_from(rest)
                .map_err(|_| ReplayError::MalformedArgs {
                    line_no,
                    verb: verb.clone(),
                })?;
            let user_id = UserId(user_id.parse().map_err(|_| malformed())?);
            let side: OrderSide = side.parse().map_err(|_| malformed())?;
            let qty = Quantity(qty.parse().map_err(|_| malformed())?);
            let _ = book.add_market(user_id, side, qty);
            Ok(())
        }
        "CANCEL" => {
            let [order_id] = <[&str; 1]>::try_from(rest).map_err(|_| ReplayError::MalformedArgs {
                line_no,
                verb: verb.clone(),
            })?;
            let order_id = OrderId(order_id.parse().map_err(|_| malformed())?);
            book.cancel(order_id);
            Ok(())
        }
        other => Err(ReplayError::UnknownVerb {
            line_no,
            verb: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn book() -> OrderBook<Vec<u8>> {
        OrderBook::new(Vec::new())
    }

    #[test]
    fn replays_add_and_cancel() {
        let mut ob = book();
        let log = "0 ADDLIMIT 1 BUY 10 5 GTC\n1 CANCEL 0\n";
        let applied = replay_into(Cursor::new(log), &mut ob).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(ob.best_bid(), None);
    }

    #[test]
    fn replay_reproduces_matching_state() {
        let mut live = book();
        live.add_limit(UserId(1), OrderSide::Buy, Price(10), Quantity(10), TimeInForce::GTC)
            .unwrap();
        live.add_limit(UserId(2), OrderSide::Sell, Price(10), Quantity(4), TimeInForce::GTC)
            .unwrap();

        let mut replayed = book();
        let log = "0 ADDLIMIT 1 BUY 10 10 GTC\n1 ADDLIMIT 2 SELL 4 10 GTC\n";
        replay_into(Cursor::new(log), &mut replayed).unwrap();

        assert_eq!(live.best_bid(), replayed.best_bid());
        assert_eq!(
            live.depth_at(OrderSide::Buy, Price(10)),
            replayed.depth_at(OrderSide::Buy, Price(10))
        );
    }

    #[test]
    fn unknown_verb_is_an_error() {
        let mut ob = book();
        let err = replay_into(Cursor::new("0 FROBNICATE 1\n"), &mut ob).unwrap_err();
        assert_eq!(
            err,
            ReplayError::UnknownVerb {
                line_no: 1,
                verb: "FROBNICATE".to_string()
            }
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut ob = book();
        let applied = replay_into(Cursor::new("\n\n0 CANCEL 9\n"), &mut ob).unwrap();
        assert_eq!(applied, 1);
    }
}
