use crate::application::sales_counter::SalesCounter;
use crate::domain::contract::{Contract, Period};
use crate::domain::ports::ContractStoreRef;
use crate::domain::{rate_table, split};
use crate::error::{CommissionError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

/// Flat rate applied when a contract carries no financing template at all.
/// Bypasses the tiered schedule; kept for parity with the historical
/// behavior of the upstream system.
const FLAT_FALLBACK_RATE: Decimal = dec!(1.00);

/// Result of pricing one contract's commission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub rate: Decimal,
    pub gross_amount: Decimal,
    pub sales_count: u32,
}

/// Combines the sales rank, the rate schedule and the contract's financing
/// data into a gross commission amount.
pub struct CommissionCalculator {
    counter: SalesCounter,
}

impl CommissionCalculator {
    pub fn new(contracts: ContractStoreRef) -> Self {
        Self {
            counter: SalesCounter::new(contracts),
        }
    }

    /// Prices the commission for `contract`.
    ///
    /// Fails with [`CommissionError::MissingFinancingData`] when the contract
    /// has no positive financing amount or no term; callers skip commission
    /// generation entirely for such contracts.
    pub async fn calculate(&self, contract: &Contract) -> Result<Calculation> {
        let financing = contract
            .financed_amount()
            .ok_or(CommissionError::MissingFinancingData(contract.id))?;
        let term_months = contract
            .term_months
            .ok_or(CommissionError::MissingFinancingData(contract.id))?;

        let period = Period::containing(contract.sign_date);
        let sales_count = self.counter.count_at(contract, period).await?;

        let rate = if contract.financing_template_id.is_some() {
            rate_table::lookup(sales_count, term_months)
        } else {
            warn!(
                contract = %contract.id,
                "no financing template on record, applying flat {FLAT_FALLBACK_RATE}% rate"
            );
            FLAT_FALLBACK_RATE
        };

        let gross_amount = split::round2(financing * rate / dec!(100));
        Ok(Calculation {
            rate,
            gross_amount,
            sales_count,
        })
    }
}
