//! Strong identifiers for the book.
//!
//! `UserId`, `OrderId`, `MatchId`, `Price`, and `Quantity` all wrap a `u64`
//! but are distinct types: the compiler will not let a `Price` stand in for
//! a `Quantity` or an `OrderId` stand in for a `MatchId`. Mixing these up is
//! a recurring class of bug in matching engines, so the confusion is made
//! impossible rather than merely documented against.

use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $name {
            /// Returns the next identifier after this one.
            #[must_use]
            pub fn next(self) -> Self {
                $name(self.0 + 1)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(OrderId);
id_newtype!(MatchId);
id_newtype!(Price);
id_newtype!(Quantity);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::Add for Quantity {
    type Output = Quantity;
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Quantity {
    type Output = Quantity;
    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl std::ops::SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        self.0 -= rhs.0;
    }
}

impl Price {
    #[must_use]
    pub fn is_valid_limit(self) -> bool {
        self.0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_newtypes_do_not_mix_at_the_type_level() {
        let p = Price(5);
        let q = Quantity(5);
        // This would not compile if uncommented: `let _: Price = q;`
        assert_eq!(p.0, q.0);
    }

    #[test]
    fn next_increments() {
        assert_eq!(OrderId(0).next(), OrderId(1));
        assert_eq!(MatchId(41).next(), MatchId(42));
    }

    #[test]
    fn quantity_arithmetic() {
        let mut q = Quantity(10);
        q -= Quantity(4);
        assert_eq!(q, Quantity(6));
        q += Quantity(1);
        assert_eq!(q, Quantity(7));
        assert!(Quantity::ZERO.is_zero());
        assert!(!q.is_zero());
    }

    #[test]
    fn price_validity() {
        assert!(!Price(0).is_valid_limit());
        assert!(Price(1).is_valid_limit());
    }
}
