use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a sales contract, assigned by the upstream sales system.
///
/// Ordered so that equal sign timestamps can be broken deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub u64);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a sales advisor, already resolved by the import pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvisorId(pub u32);

impl fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Cancelled,
}

/// A signed sales contract as received from the sales system.
///
/// Read-only to this crate: contracts are inputs, never mutated. Cash sales
/// carry no financing amount and never produce a commission here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    #[serde(rename = "advisor")]
    pub advisor_id: AdvisorId,
    pub financing_amount: Option<Decimal>,
    pub term_months: Option<u32>,
    pub sign_date: DateTime<Utc>,
    pub status: ContractStatus,
    /// Financial template the financing terms were drawn from. A contract
    /// without one falls back to a flat commission rate.
    #[serde(rename = "template")]
    pub financing_template_id: Option<u64>,
}

impl Contract {
    /// The financed amount, if this contract is a financed sale.
    pub fn financed_amount(&self) -> Option<Decimal> {
        self.financing_amount.filter(|a| *a > Decimal::ZERO)
    }

    /// Whether this contract counts towards an advisor's qualifying sales:
    /// active and financed.
    pub fn is_qualifying(&self) -> bool {
        self.status == ContractStatus::Active && self.financed_amount().is_some()
    }

    /// Ordering key used when ranking an advisor's sales within a period.
    /// Equal timestamps are broken by ascending contract id.
    pub fn sale_order_key(&self) -> (DateTime<Utc>, ContractId) {
        (self.sign_date, self.id)
    }
}

/// A calendar month, the granularity at which commissions are generated and
/// sales counts accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// The period a sign timestamp falls into.
    pub fn containing(at: DateTime<Utc>) -> Self {
        let date = at.date_naive();
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract(financing: Option<Decimal>, status: ContractStatus) -> Contract {
        Contract {
            id: ContractId(1),
            advisor_id: AdvisorId(1),
            financing_amount: financing,
            term_months: Some(24),
            sign_date: "2026-03-05T10:00:00Z".parse().unwrap(),
            status,
            financing_template_id: Some(1),
        }
    }

    #[test]
    fn test_cash_sale_is_not_qualifying() {
        assert!(!contract(None, ContractStatus::Active).is_qualifying());
        assert!(!contract(Some(dec!(0)), ContractStatus::Active).is_qualifying());
        assert!(!contract(Some(dec!(-5)), ContractStatus::Active).is_qualifying());
    }

    #[test]
    fn test_cancelled_contract_is_not_qualifying() {
        assert!(!contract(Some(dec!(100000)), ContractStatus::Cancelled).is_qualifying());
        assert!(contract(Some(dec!(100000)), ContractStatus::Active).is_qualifying());
    }

    #[test]
    fn test_period_containing_and_contains() {
        let period = Period::containing("2026-03-31T23:59:59Z".parse().unwrap());
        assert_eq!(period, Period::new(3, 2026));
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    }

    #[test]
    fn test_sale_order_key_breaks_ties_by_id() {
        let mut a = contract(Some(dec!(100000)), ContractStatus::Active);
        let mut b = a.clone();
        a.id = ContractId(1);
        b.id = ContractId(2);
        assert!(a.sale_order_key() < b.sale_order_key());
    }

    #[test]
    fn test_contract_csv_deserialization() {
        let csv = "id,advisor,financing_amount,term_months,sign_date,status,template\n\
                   1,7,100000,24,2026-03-05T10:00:00Z,active,301";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let contract: Contract = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(contract.id, ContractId(1));
        assert_eq!(contract.advisor_id, AdvisorId(7));
        assert_eq!(contract.financing_amount, Some(dec!(100000)));
        assert_eq!(contract.status, ContractStatus::Active);
    }

    #[test]
    fn test_cash_sale_csv_row_has_empty_financing_fields() {
        let csv = "id,advisor,financing_amount,term_months,sign_date,status,template\n\
                   2,7,,,2026-03-06T10:00:00Z,active,";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let contract: Contract = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(contract.financing_amount, None);
        assert_eq!(contract.term_months, None);
        assert_eq!(contract.financing_template_id, None);
    }
}
