//! Splits a gross commission into its two payable halves.
//!
//! Pure and public for direct testing, like the rate table.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Half-up rounding to two decimals, the rounding used for every persisted
/// money amount in this crate.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The amounts of a parent/child commission set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// Full gross amount, kept on the parent audit row.
    pub parent: Decimal,
    pub first: Decimal,
    pub second: Decimal,
}

/// Divides `gross` between the two payable parts: 70/30 from the tenth
/// qualifying sale of the month onwards, 50/50 below that.
///
/// The second part is always `parent - first`, so the children sum to the
/// rounded parent amount for every input.
pub fn allocate(gross: Decimal, sales_count: u32) -> Split {
    let parent = round2(gross);
    let first_share = if sales_count >= 10 {
        dec!(0.70)
    } else {
        dec!(0.50)
    };
    let first = round2(gross * first_share);
    Split {
        parent,
        first,
        second: parent - first,
    }
}
