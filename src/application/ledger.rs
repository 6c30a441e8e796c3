use crate::application::calculator::CommissionCalculator;
use crate::domain::commission::{Commission, CommissionId, NewFamily, PaymentStatus, PayoutBlock};
use crate::domain::contract::{AdvisorId, ContractStatus, Period};
use crate::domain::ports::{
    CommissionStoreRef, ContractStoreRef, InstallmentStoreRef, PayoutDecision,
};
use crate::domain::split;
use crate::error::{CommissionError, Result};
use tracing::{info, warn};

/// Narrowing criteria for payable queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayableFilter {
    pub employee_id: Option<AdvisorId>,
    pub period: Option<Period>,
}

/// Result of a payout batch: how many records were marked paid, and which
/// ids were refused and why. Rejections never abort the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutOutcome {
    pub updated: usize,
    pub rejected: Vec<(CommissionId, PayoutBlock)>,
}

/// The persisted commission set and the operations exposed to payout
/// processors and import pipelines: generate, query payable, mark paid.
pub struct CommissionLedger {
    contracts: ContractStoreRef,
    installments: InstallmentStoreRef,
    commissions: CommissionStoreRef,
    calculator: CommissionCalculator,
}

impl CommissionLedger {
    pub fn new(
        contracts: ContractStoreRef,
        installments: InstallmentStoreRef,
        commissions: CommissionStoreRef,
    ) -> Self {
        let calculator = CommissionCalculator::new(contracts.clone());
        Self {
            contracts,
            installments,
            commissions,
            calculator,
        }
    }

    /// Generates commissions for every qualifying contract signed in the
    /// period. Idempotent: pairs that already have a commission family keep
    /// it unchanged, and the existing records are returned alongside newly
    /// generated ones. Contracts without financing data are logged and
    /// skipped.
    pub async fn generate_for_period(&self, period: Period) -> Result<Vec<Commission>> {
        let mut out = Vec::new();
        let mut generated = 0usize;
        let mut skipped = 0usize;

        for contract in self.contracts.signed_in(period).await? {
            if contract.status != ContractStatus::Active {
                continue;
            }

            let existing = self
                .commissions
                .family_of(contract.id, contract.advisor_id)
                .await?;
            if !existing.is_empty() {
                out.extend(existing);
                continue;
            }

            let calculation = match self.calculator.calculate(&contract).await {
                Ok(c) => c,
                Err(CommissionError::MissingFinancingData(id)) => {
                    warn!(contract = %id, "no financing data, skipping commission generation");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let split = split::allocate(calculation.gross_amount, calculation.sales_count);
            // A contract with no installment plan was paid upfront; its
            // commission needs no client-payment evidence.
            let requires_verification = !self
                .installments
                .schedule_for(contract.id)
                .await?
                .is_empty();

            let records = self
                .commissions
                .insert_family(NewFamily {
                    contract_id: contract.id,
                    employee_id: contract.advisor_id,
                    period,
                    rate: calculation.rate,
                    sales_count: calculation.sales_count,
                    gross_amount: split.parent,
                    first_amount: split.first,
                    second_amount: split.second,
                    requires_verification,
                })
                .await?;
            generated += 1;
            out.extend(records);
        }

        info!(%period, generated, skipped, "commission generation finished");
        Ok(out)
    }

    /// Child commissions that are payable and not yet paid, optionally
    /// narrowed to one employee or one generation period.
    pub async fn get_payable(&self, filter: PayableFilter) -> Result<Vec<Commission>> {
        let mut payable: Vec<Commission> = self
            .commissions
            .all()
            .await?
            .into_iter()
            .filter(|c| c.is_payable() && c.payment_status == PaymentStatus::Pending)
            .filter(|c| filter.employee_id.is_none_or(|e| c.employee_id == e))
            .filter(|c| filter.period.is_none_or(|p| c.period == p))
            .collect();
        payable.sort_by_key(|c| c.id);
        Ok(payable)
    }

    /// Marks each id paid unless doing so would double-pay the same economic
    /// amount through the parent/child split. Rejected ids are reported and
    /// leave no state change; the rest of the batch proceeds.
    pub async fn mark_paid(&self, ids: &[CommissionId]) -> Result<PayoutOutcome> {
        let mut outcome = PayoutOutcome {
            updated: 0,
            rejected: Vec::new(),
        };
        for &id in ids {
            match self.commissions.mark_paid(id).await? {
                PayoutDecision::Updated => outcome.updated += 1,
                PayoutDecision::Blocked(block) => {
                    warn!(commission = %id, %block, "payout rejected");
                    outcome.rejected.push((id, block));
                }
            }
        }
        Ok(outcome)
    }
}
