//! The append-only event log: one line per accepted mutation, sufficient
//! for deterministic replay (see `replay.rs`).
//!
//! The log is write-only from the engine's side and must never be
//! consulted during matching; matching must not depend on the log's
//! success. Sink I/O failures are logged and otherwise swallowed — they are
//! not propagated through the engine's public methods (see spec §5, §7).

use crate::ids::{OrderId, Price, Quantity, UserId};
use crate::types::{OrderSide, TimeInForce};

/// Anything the event log can write a line to.
///
/// Implemented for every `std::io::Write`, so a `File`, a `Vec<u8>`, or
/// `std::io::sink()` all work as a destination without the core needing to
/// know anything about files, sockets, or buffers.
pub trait EventSink {
    fn write_line(&mut self, line: &str);
}

impl<W: std::io::Write> EventSink for W {
    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self, "{line}") {
            tracing::error!(error = %err, "event sink write failed");
        }
    }
}

/// One logged command, independent of its sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    AddLimit {
        user_id: UserId,
        side: OrderSide,
        qty: Quantity,
        price: Price,
        tif: TimeInForce,
    },
    AddMarket {
        user_id: UserId,
        side: OrderSide,
        qty: Quantity,
    },
    Cancel {
        order_id: OrderId,
    },
}

impl Event {
    fn render(&self) -> String {
        match self {
            Event::AddLimit {
                user_id,
                side,
                qty,
                price,
                tif,
            } => format!("ADDLIMIT {user_id} {side} {qty} {price} {tif}"),
            Event::AddMarket { user_id, side, qty } => {
                format!("ADDMARKET {user_id} {side} {qty}")
            }
            Event::Cancel { order_id } => format!("CANCEL {order_id}"),
        }
    }
}

/// Monotonic sequence counter plus the sink each event is written to.
pub struct EventLog<S: EventSink> {
    sink: S,
    seq: u64,
}

impl<S: EventSink> EventLog<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, seq: 0 }
    }

    /// Stamps `event` with the next sequence number, writes it, and
    /// advances the counter.
    pub fn append_event(&mut self, event: Event) {
        let line = format!("{} {}", self.seq, event.render());
        self.sink.write_line(&line);
        self.seq += 1;
    }

    pub fn event_seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_add_limit_per_wire_format() {
        let event = Event::AddLimit {
            user_id: UserId(3),
            side: OrderSide::Buy,
            qty: Quantity(10),
            price: Price(5),
            tif: TimeInForce::GTC,
        };
        assert_eq!(event.render(), "ADDLIMIT 3 BUY 10 5 GTC");
    }

    #[test]
    fn renders_add_market_and_cancel() {
        assert_eq!(
            Event::AddMarket {
                user_id: UserId(1),
                side: OrderSide::Sell,
                qty: Quantity(7),
            }
            .render(),
            "ADDMARKET 1 SELL 7"
        );
        assert_eq!(
            Event::Cancel {
                order_id: OrderId(9)
            }
            .render(),
            "CANCEL 9"
        );
    }

    #[test]
    fn sequence_number_is_monotonic_and_prefixes_each_line() {
        let mut buf: Vec<u8> = Vec::new();
        let mut log = EventLog::new(&mut buf);
        log.append_event(Event::Cancel {
            order_id: OrderId(1),
        });
        log.append_event(Event::Cancel {
            order_id: OrderId(2),
        });
        assert_eq!(log.event_seq(), 2);
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "0 CANCEL 1");
        assert_eq!(lines.next().unwrap(), "1 CANCEL 2");
    }
}
