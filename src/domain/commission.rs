use crate::domain::contract::{AdvisorId, ContractId, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a commission record, assigned by the commission store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionId(pub u64);

impl fmt::Display for CommissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which of the two payable installments a child commission represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPart {
    First,
    Second,
}

impl PaymentPart {
    /// Position of the loan installment this part is gated on, in a schedule
    /// ordered by due date ascending.
    pub fn installment_index(self) -> usize {
        match self {
            PaymentPart::First => 0,
            PaymentPart::Second => 1,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PaymentPart::First => 1,
            PaymentPart::Second => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    PartiallyVerified,
    FullyVerified,
    NotRequired,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::PartiallyVerified => "partially_verified",
            VerificationStatus::FullyVerified => "fully_verified",
            VerificationStatus::NotRequired => "not_required",
        }
    }

    /// Terminal states grant payability and are never left again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationStatus::FullyVerified | VerificationStatus::NotRequired
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// A persisted commission record.
///
/// One parent (audit/rollup row, `parent_id == None`) plus two children (the
/// payable halves) exist per contract and employee. Records are created once
/// and only ever mutated through verification and payout; they are never
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub contract_id: ContractId,
    pub employee_id: AdvisorId,
    pub parent_id: Option<CommissionId>,
    pub payment_part: Option<PaymentPart>,
    /// Commission percentage snapshotted at creation.
    pub rate: Decimal,
    pub amount: Decimal,
    /// Qualifying-sales count used to pick the rate, snapshotted at creation.
    pub sales_count: u32,
    /// Generation period snapshot, used for payable queries.
    pub period: Period,
    pub requires_verification: bool,
    pub verification: VerificationStatus,
    pub payment_status: PaymentStatus,
}

impl Commission {
    pub fn is_parent(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Derived payability: only a child whose verification reached a terminal
    /// state can be paid out. The parent is an audit row and never payable.
    pub fn is_payable(&self) -> bool {
        self.parent_id.is_some() && self.verification.is_terminal()
    }

    /// Moves the verification status forward, refusing any regression out of
    /// a terminal state. Returns whether the record actually changed, so
    /// callers can skip persisting no-op re-verifications.
    pub fn advance_verification(&mut self, to: VerificationStatus) -> bool {
        if self.verification == to || self.verification.is_terminal() {
            return false;
        }
        if self.verification == VerificationStatus::PartiallyVerified
            && to == VerificationStatus::Pending
        {
            return false;
        }
        self.verification = to;
        true
    }
}

/// Why a payout request for a commission id was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutBlock {
    NotFound,
    AlreadyPaid,
    /// Child whose verification has not reached a terminal state.
    NotPayable,
    /// The same economic amount was already paid out through the other side
    /// of the parent/child split.
    CounterpartPaid,
}

impl fmt::Display for PayoutBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayoutBlock::NotFound => "commission not found",
            PayoutBlock::AlreadyPaid => "already paid",
            PayoutBlock::NotPayable => "payment verification incomplete",
            PayoutBlock::CounterpartPaid => "counterpart record already paid",
        };
        f.write_str(s)
    }
}

/// Checks whether `target` may transition to `Paid`, given every commission
/// record of its contract/employee family.
///
/// The rule: once any child is paid the parent may never be, and vice versa.
/// Both children paying out is the normal two-installment flow and is allowed.
pub fn payout_block(target: &Commission, family: &[Commission]) -> Option<PayoutBlock> {
    if target.payment_status == PaymentStatus::Paid {
        return Some(PayoutBlock::AlreadyPaid);
    }
    if target.is_parent() {
        let child_paid = family
            .iter()
            .any(|c| c.parent_id == Some(target.id) && c.payment_status == PaymentStatus::Paid);
        if child_paid {
            return Some(PayoutBlock::CounterpartPaid);
        }
    } else {
        if !target.is_payable() {
            return Some(PayoutBlock::NotPayable);
        }
        let parent_paid = family
            .iter()
            .any(|c| Some(c.id) == target.parent_id && c.payment_status == PaymentStatus::Paid);
        if parent_paid {
            return Some(PayoutBlock::CounterpartPaid);
        }
    }
    None
}

/// Everything needed to create the parent and both children of a
/// contract/employee pair. The store assigns record ids and wires the
/// parent/child linkage when the family is first persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFamily {
    pub contract_id: ContractId,
    pub employee_id: AdvisorId,
    pub period: Period,
    pub rate: Decimal,
    pub sales_count: u32,
    pub gross_amount: Decimal,
    pub first_amount: Decimal,
    pub second_amount: Decimal,
    pub requires_verification: bool,
}

impl NewFamily {
    /// Materializes the three records once the store has assigned their ids.
    ///
    /// Children of an upfront-paid contract are born `NotRequired` and are
    /// immediately payable; everything else starts `Pending`.
    pub fn records(
        &self,
        parent_id: CommissionId,
        first_id: CommissionId,
        second_id: CommissionId,
    ) -> [Commission; 3] {
        let child_verification = if self.requires_verification {
            VerificationStatus::Pending
        } else {
            VerificationStatus::NotRequired
        };
        let child = |id: CommissionId, part: PaymentPart, amount: Decimal| Commission {
            id,
            contract_id: self.contract_id,
            employee_id: self.employee_id,
            parent_id: Some(parent_id),
            payment_part: Some(part),
            rate: self.rate,
            amount,
            sales_count: self.sales_count,
            period: self.period,
            requires_verification: self.requires_verification,
            verification: child_verification,
            payment_status: PaymentStatus::Pending,
        };

        let parent = Commission {
            id: parent_id,
            contract_id: self.contract_id,
            employee_id: self.employee_id,
            parent_id: None,
            payment_part: None,
            rate: self.rate,
            amount: self.gross_amount,
            sales_count: self.sales_count,
            period: self.period,
            requires_verification: false,
            verification: VerificationStatus::NotRequired,
            payment_status: PaymentStatus::Pending,
        };

        [
            parent,
            child(first_id, PaymentPart::First, self.first_amount),
            child(second_id, PaymentPart::Second, self.second_amount),
        ]
    }
}
