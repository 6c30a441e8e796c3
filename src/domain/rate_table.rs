//! Tiered commission rate lookup.
//!
//! Pure and total: any sales count and any term length map to a rate. Public
//! so the table can be tested directly against the business schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Financing terms of 12, 24 or 36 months pay the short-term schedule;
/// everything else, including unknown term lengths, pays the long-term one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermClass {
    Short,
    Long,
}

impl TermClass {
    pub fn classify(term_months: u32) -> Self {
        match term_months {
            12 | 24 | 36 => TermClass::Short,
            _ => TermClass::Long,
        }
    }
}

/// Looks up the commission percentage for the advisor's `sales_count`-th
/// qualifying sale of the month. The highest band the count reaches wins.
pub fn lookup(sales_count: u32, term_months: u32) -> Decimal {
    let (short, long) = match sales_count {
        10.. => (dec!(4.20), dec!(3.00)),
        8..=9 => (dec!(4.00), dec!(2.50)),
        6..=7 => (dec!(3.00), dec!(1.50)),
        _ => (dec!(2.00), dec!(1.00)),
    };
    match TermClass::classify(term_months) {
        TermClass::Short => short,
        TermClass::Long => long,
    }
}
