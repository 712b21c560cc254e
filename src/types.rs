//! Enumerations shared across the book: sides, time-in-force, order status,
//! and the rejection reasons an admission path can return.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub fn opposite(self) -> OrderSide {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        })
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            other => Err(format!("unknown side `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeInForce {
    /// Good-Till-Cancel: any unfilled remainder rests on the book.
    GTC,
    /// Immediate-Or-Cancel: any unfilled remainder is discarded.
    IOC,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeInForce::GTC => "GTC",
            TimeInForce::IOC => "IOC",
        })
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GTC" => Ok(TimeInForce::GTC),
            "IOC" => Ok(TimeInForce::IOC),
            other => Err(format!("unknown time-in-force `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Rests on the book with its full remaining quantity unfilled.
    AwaitingFill,
    /// Some quantity traded; a remainder may rest (GTC) or was discarded (IOC).
    PartialFill,
    /// Fully filled by crossing; nothing rests.
    ImmediateFill,
    /// Not admitted; see the accompanying `RejectReason`.
    Rejected,
}

/// Why an `AddLimit`/`AddMarket` call was refused admission.
///
/// Rejected calls mutate no state and log no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum RejectReason {
    #[error("price must be nonzero for a limit order")]
    BadPrice,
    #[error("quantity must be nonzero")]
    BadQty,
    #[error("no resting liquidity on the opposite side for a market order")]
    EmptyBookForMarket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_roundtrips_through_display_and_from_str() {
        for side in [OrderSide::Buy, OrderSide::Sell] {
            assert_eq!(side.to_string().parse::<OrderSide>().unwrap(), side);
        }
    }

    #[test]
    fn tif_roundtrips_through_display_and_from_str() {
        for tif in [TimeInForce::GTC, TimeInForce::IOC] {
            assert_eq!(tif.to_string().parse::<TimeInForce>().unwrap(), tif);
        }
    }

    #[test]
    fn side_opposite_is_involutive() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Buy.opposite().opposite(), OrderSide::Buy);
    }

    #[test]
    fn reject_reason_has_error_messages() {
        assert!(RejectReason::BadQty.to_string().contains("quantity"));
        assert!(RejectReason::BadPrice.to_string().contains("price"));
    }
}
