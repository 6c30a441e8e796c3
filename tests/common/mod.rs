use commission_engine::application::ledger::CommissionLedger;
use commission_engine::application::verification::VerificationEngine;
use commission_engine::domain::contract::{AdvisorId, Contract, ContractId, ContractStatus};
use commission_engine::domain::receivable::{
    ClientPayment, Installment, InstallmentId, InstallmentStatus,
};
use commission_engine::infrastructure::in_memory::{
    InMemoryClientPaymentStore, InMemoryCommissionStore, InMemoryContractStore,
    InMemoryInstallmentStore,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// A fully wired in-memory engine for integration tests.
pub struct Harness {
    pub contracts: Arc<InMemoryContractStore>,
    pub installments: Arc<InMemoryInstallmentStore>,
    pub payments: Arc<InMemoryClientPaymentStore>,
    pub commissions: Arc<InMemoryCommissionStore>,
    pub ledger: CommissionLedger,
    pub engine: VerificationEngine,
}

pub fn harness() -> Harness {
    let contracts = Arc::new(InMemoryContractStore::new());
    let installments = Arc::new(InMemoryInstallmentStore::new());
    let payments = Arc::new(InMemoryClientPaymentStore::new());
    let commissions = Arc::new(InMemoryCommissionStore::new());

    let ledger = CommissionLedger::new(
        contracts.clone(),
        installments.clone(),
        commissions.clone(),
    );
    let engine = VerificationEngine::new(
        commissions.clone(),
        installments.clone(),
        payments.clone(),
    );

    Harness {
        contracts,
        installments,
        payments,
        commissions,
        ledger,
        engine,
    }
}

pub fn contract(id: u64, advisor: u32, financing: Decimal, term: u32, sign_date: &str) -> Contract {
    Contract {
        id: ContractId(id),
        advisor_id: AdvisorId(advisor),
        financing_amount: Some(financing),
        term_months: Some(term),
        sign_date: sign_date.parse().unwrap(),
        status: ContractStatus::Active,
        financing_template_id: Some(301),
    }
}

pub fn cash_contract(id: u64, advisor: u32, sign_date: &str) -> Contract {
    Contract {
        id: ContractId(id),
        advisor_id: AdvisorId(advisor),
        financing_amount: None,
        term_months: None,
        sign_date: sign_date.parse().unwrap(),
        status: ContractStatus::Active,
        financing_template_id: None,
    }
}

pub fn installment(id: u64, contract: u64, due: &str, amount: Decimal) -> Installment {
    Installment {
        id: InstallmentId(id),
        contract_id: ContractId(contract),
        due_date: due.parse().unwrap(),
        original_amount: amount,
        outstanding_amount: amount,
        status: InstallmentStatus::Open,
    }
}

pub fn payment(installment: u64, amount: Decimal) -> ClientPayment {
    ClientPayment {
        installment_id: InstallmentId(installment),
        amount,
        payment_date: "2026-03-28".parse().unwrap(),
    }
}

/// Seeds `count` financed short-term contracts for one advisor, one per day
/// of March 2026, ids 1..=count.
pub async fn seed_march_sales(h: &Harness, advisor: u32, count: u64) {
    for i in 1..=count {
        h.contracts
            .insert(contract(
                i,
                advisor,
                dec!(100000),
                24,
                &format!("2026-03-{:02}T09:00:00Z", i),
            ))
            .await;
    }
}
