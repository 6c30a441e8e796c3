use crate::domain::commission::{
    Commission, CommissionId, NewFamily, PaymentStatus, PayoutBlock, payout_block,
};
use crate::domain::contract::{AdvisorId, Contract, ContractId, Period};
use crate::domain::ports::{
    ClientPaymentStore, CommissionStore, ContractStore, InstallmentStore, PayoutDecision,
};
use crate::domain::receivable::{ClientPayment, Installment, InstallmentId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory contract read model, loaded from the sales system's export.
///
/// Thread-safe; `Clone` shares the underlying map.
#[derive(Default, Clone)]
pub struct InMemoryContractStore {
    contracts: Arc<RwLock<HashMap<ContractId, Contract>>>,
}

impl InMemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contract: Contract) {
        let mut contracts = self.contracts.write().await;
        contracts.insert(contract.id, contract);
    }
}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn get(&self, id: ContractId) -> Result<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&id).cloned())
    }

    async fn by_advisor(&self, advisor_id: AdvisorId) -> Result<Vec<Contract>> {
        let contracts = self.contracts.read().await;
        let mut found: Vec<Contract> = contracts
            .values()
            .filter(|c| c.advisor_id == advisor_id)
            .cloned()
            .collect();
        found.sort_by_key(Contract::sale_order_key);
        Ok(found)
    }

    async fn signed_in(&self, period: Period) -> Result<Vec<Contract>> {
        let contracts = self.contracts.read().await;
        let mut found: Vec<Contract> = contracts
            .values()
            .filter(|c| period.contains(c.sign_date.date_naive()))
            .cloned()
            .collect();
        found.sort_by_key(Contract::sale_order_key);
        Ok(found)
    }
}

/// In-memory installment schedule read model.
#[derive(Default, Clone)]
pub struct InMemoryInstallmentStore {
    installments: Arc<RwLock<HashMap<InstallmentId, Installment>>>,
}

impl InMemoryInstallmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, installment: Installment) {
        let mut installments = self.installments.write().await;
        installments.insert(installment.id, installment);
    }
}

#[async_trait]
impl InstallmentStore for InMemoryInstallmentStore {
    async fn schedule_for(&self, contract_id: ContractId) -> Result<Vec<Installment>> {
        let installments = self.installments.read().await;
        let mut schedule: Vec<Installment> = installments
            .values()
            .filter(|i| i.contract_id == contract_id)
            .cloned()
            .collect();
        schedule.sort_by_key(|i| (i.due_date, i.id));
        Ok(schedule)
    }
}

/// In-memory client payment read model.
#[derive(Default, Clone)]
pub struct InMemoryClientPaymentStore {
    payments: Arc<RwLock<Vec<ClientPayment>>>,
}

impl InMemoryClientPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, payment: ClientPayment) {
        let mut payments = self.payments.write().await;
        payments.push(payment);
    }
}

#[async_trait]
impl ClientPaymentStore for InMemoryClientPaymentStore {
    async fn for_installment(&self, installment_id: InstallmentId) -> Result<Vec<ClientPayment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|p| p.installment_id == installment_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct CommissionRecords {
    records: HashMap<CommissionId, Commission>,
    next_id: u64,
}

impl CommissionRecords {
    fn allocate_id(&mut self) -> CommissionId {
        self.next_id += 1;
        CommissionId(self.next_id)
    }

    fn family_of(&self, contract_id: ContractId, employee_id: AdvisorId) -> Vec<Commission> {
        let mut family: Vec<Commission> = self
            .records
            .values()
            .filter(|c| c.contract_id == contract_id && c.employee_id == employee_id)
            .cloned()
            .collect();
        family.sort_by_key(|c| c.id);
        family
    }
}

/// In-memory commission store.
///
/// A single write lock spans each uniqueness-check-plus-insert and each
/// payout check-plus-write, giving the at-most-once and mutual-exclusion
/// guarantees their atomic unit.
#[derive(Default, Clone)]
pub struct InMemoryCommissionStore {
    inner: Arc<RwLock<CommissionRecords>>,
}

impl InMemoryCommissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommissionStore for InMemoryCommissionStore {
    async fn insert_family(&self, family: NewFamily) -> Result<Vec<Commission>> {
        let mut inner = self.inner.write().await;
        let existing = inner.family_of(family.contract_id, family.employee_id);
        if !existing.is_empty() {
            return Ok(existing);
        }

        let parent_id = inner.allocate_id();
        let first_id = inner.allocate_id();
        let second_id = inner.allocate_id();
        let records = family.records(parent_id, first_id, second_id);
        for record in &records {
            inner.records.insert(record.id, record.clone());
        }
        Ok(records.to_vec())
    }

    async fn get(&self, id: CommissionId) -> Result<Option<Commission>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn family_of(
        &self,
        contract_id: ContractId,
        employee_id: AdvisorId,
    ) -> Result<Vec<Commission>> {
        let inner = self.inner.read().await;
        Ok(inner.family_of(contract_id, employee_id))
    }

    async fn children_of(&self, parent_id: CommissionId) -> Result<Vec<Commission>> {
        let inner = self.inner.read().await;
        let mut children: Vec<Commission> = inner
            .records
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|c| c.id);
        Ok(children)
    }

    async fn update(&self, commission: Commission) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.records.insert(commission.id, commission);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Commission>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Commission> = inner.records.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn mark_paid(&self, id: CommissionId) -> Result<PayoutDecision> {
        let mut inner = self.inner.write().await;
        let Some(target) = inner.records.get(&id).cloned() else {
            return Ok(PayoutDecision::Blocked(PayoutBlock::NotFound));
        };
        let family = inner.family_of(target.contract_id, target.employee_id);
        if let Some(block) = payout_block(&target, &family) {
            return Ok(PayoutDecision::Blocked(block));
        }
        if let Some(record) = inner.records.get_mut(&id) {
            record.payment_status = PaymentStatus::Paid;
        }
        Ok(PayoutDecision::Updated)
    }
}
