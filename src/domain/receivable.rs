use crate::domain::contract::ContractId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absorbs rounding drift between a schedule amount and the payments that
/// settle it: one minor currency unit.
pub const PAYMENT_TOLERANCE: Decimal = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallmentId(pub u64);

impl fmt::Display for InstallmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Open,
    Paid,
    Overdue,
}

/// One line of a client's loan payment schedule, owned by accounts
/// receivable. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    #[serde(rename = "contract")]
    pub contract_id: ContractId,
    pub due_date: NaiveDate,
    pub original_amount: Decimal,
    pub outstanding_amount: Decimal,
    pub status: InstallmentStatus,
}

impl Installment {
    /// Whether this installment counts as settled by the client: either the
    /// receivable ledger already marked it paid, or the recorded payments
    /// cover the original amount within [`PAYMENT_TOLERANCE`].
    pub fn is_settled_by(&self, paid_total: Decimal) -> bool {
        self.status == InstallmentStatus::Paid
            || paid_total >= self.original_amount - PAYMENT_TOLERANCE
    }
}

/// A payment the client made against one installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPayment {
    #[serde(rename = "installment")]
    pub installment_id: InstallmentId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}
