//! A single-threaded, in-process limit order book: price-time priority
//! matching, O(1) cancel, and a replayable event log.
//!
//! The book itself never touches I/O, CLI parsing, or logging
//! configuration — see `book::OrderBook` for the matching core and
//! `replay::replay_into` for reconstructing state from a logged stream.
//! The `clob` binary (`main.rs`/`cli.rs`) wires both to the filesystem.

pub mod book;
pub mod events;
pub mod ids;
pub mod invariants;
pub mod level;
pub mod locator;
pub mod order;
pub mod replay;
pub mod trade;
pub mod types;
