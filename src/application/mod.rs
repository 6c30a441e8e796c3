//! Application layer orchestrating the commission lifecycle over the store
//! ports: pricing, generation, payment verification and payout.

pub mod calculator;
pub mod ledger;
pub mod sales_counter;
pub mod verification;
