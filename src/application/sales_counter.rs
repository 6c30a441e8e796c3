use crate::domain::contract::{Contract, Period};
use crate::domain::ports::ContractStoreRef;
use crate::error::Result;

/// Ranks a contract among its advisor's qualifying sales of a calendar month.
///
/// The rank drives the progressive rate: the Nth financed, active sale an
/// advisor closes in the month is commissioned at the band for N.
pub struct SalesCounter {
    contracts: ContractStoreRef,
}

impl SalesCounter {
    pub fn new(contracts: ContractStoreRef) -> Self {
        Self { contracts }
    }

    /// The 1-based position of `contract` among the advisor's active,
    /// financed contracts signed in `period`, counting every qualifying sale
    /// up to and including the contract itself. Equal sign timestamps are
    /// ordered by ascending contract id.
    pub async fn count_at(&self, contract: &Contract, period: Period) -> Result<u32> {
        let key = contract.sale_order_key();
        let mut count = 0;
        for other in self.contracts.by_advisor(contract.advisor_id).await? {
            if other.is_qualifying()
                && period.contains(other.sign_date.date_naive())
                && other.sale_order_key() <= key
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
