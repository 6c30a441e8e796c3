use crate::domain::commission::{Commission, CommissionId, NewFamily, PayoutBlock};
use crate::domain::contract::{AdvisorId, Contract, ContractId, Period};
use crate::domain::receivable::{ClientPayment, Installment, InstallmentId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of an atomic payout attempt against the commission store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutDecision {
    Updated,
    Blocked(PayoutBlock),
}

/// Read-only access to the contracts owned by the sales system.
#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn get(&self, id: ContractId) -> Result<Option<Contract>>;
    async fn by_advisor(&self, advisor_id: AdvisorId) -> Result<Vec<Contract>>;
    /// Contracts signed inside the period, ordered by sign date then id.
    async fn signed_in(&self, period: Period) -> Result<Vec<Contract>>;
}

/// Read-only access to the accounts-receivable payment schedule.
#[async_trait]
pub trait InstallmentStore: Send + Sync {
    /// The contract's installments ordered by due date ascending, id as
    /// tie-break.
    async fn schedule_for(&self, contract_id: ContractId) -> Result<Vec<Installment>>;
}

/// Read-only access to the client payments recorded against installments.
#[async_trait]
pub trait ClientPaymentStore: Send + Sync {
    async fn for_installment(&self, installment_id: InstallmentId) -> Result<Vec<ClientPayment>>;
}

/// The persisted set of commission records.
#[async_trait]
pub trait CommissionStore: Send + Sync {
    /// Creates the parent and both children for a contract/employee pair,
    /// assigning ids, or returns the existing family unchanged. The
    /// existence check and the insert happen as one atomic unit.
    async fn insert_family(&self, family: NewFamily) -> Result<Vec<Commission>>;

    async fn get(&self, id: CommissionId) -> Result<Option<Commission>>;

    /// All records (parent and children) of a contract/employee pair,
    /// ordered by id.
    async fn family_of(
        &self,
        contract_id: ContractId,
        employee_id: AdvisorId,
    ) -> Result<Vec<Commission>>;

    async fn children_of(&self, parent_id: CommissionId) -> Result<Vec<Commission>>;

    async fn update(&self, commission: Commission) -> Result<()>;

    async fn all(&self) -> Result<Vec<Commission>>;

    /// Marks one commission paid after re-checking the parent/child
    /// exclusion rule against the stored family. Check and write are one
    /// atomic unit; a blocked id leaves the store untouched.
    async fn mark_paid(&self, id: CommissionId) -> Result<PayoutDecision>;
}

pub type ContractStoreRef = Arc<dyn ContractStore>;
pub type InstallmentStoreRef = Arc<dyn InstallmentStore>;
pub type ClientPaymentStoreRef = Arc<dyn ClientPaymentStore>;
pub type CommissionStoreRef = Arc<dyn CommissionStore>;
