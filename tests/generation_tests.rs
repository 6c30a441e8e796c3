use commission_engine::application::ledger::PayableFilter;
use commission_engine::domain::commission::{PaymentPart, VerificationStatus};
use commission_engine::domain::contract::{AdvisorId, ContractId, Period};
use commission_engine::domain::ports::CommissionStore;
use rust_decimal_macros::dec;

mod common;

#[tokio::test]
async fn test_seventh_sale_splits_fifty_fifty() {
    let h = common::harness();
    common::seed_march_sales(&h, 7, 7).await;

    let generated = h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();
    assert_eq!(generated.len(), 21);

    let family = h
        .commissions
        .family_of(ContractId(7), AdvisorId(7))
        .await
        .unwrap();
    let [parent, first, second] = family.as_slice() else {
        panic!("expected parent and two children");
    };

    // 7th short-term sale: 3.00% of 100,000, split evenly below ten sales.
    assert_eq!(parent.rate, dec!(3.00));
    assert_eq!(parent.sales_count, 7);
    assert_eq!(parent.amount, dec!(3000.00));
    assert_eq!(first.amount, dec!(1500.00));
    assert_eq!(second.amount, dec!(1500.00));
    assert_eq!(first.payment_part, Some(PaymentPart::First));
    assert_eq!(second.payment_part, Some(PaymentPart::Second));
}

#[tokio::test]
async fn test_tenth_long_term_sale_splits_seventy_thirty() {
    let h = common::harness();
    common::seed_march_sales(&h, 7, 9).await;
    h.contracts
        .insert(common::contract(
            10,
            7,
            dec!(100000),
            48,
            "2026-03-10T09:00:00Z",
        ))
        .await;

    h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();

    let family = h
        .commissions
        .family_of(ContractId(10), AdvisorId(7))
        .await
        .unwrap();
    let [parent, first, second] = family.as_slice() else {
        panic!("expected parent and two children");
    };

    // Long-term band at ten sales: 3.00%, split 70/30.
    assert_eq!(parent.rate, dec!(3.00));
    assert_eq!(parent.amount, dec!(3000.00));
    assert_eq!(first.amount, dec!(2100.00));
    assert_eq!(second.amount, dec!(900.00));
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let h = common::harness();
    common::seed_march_sales(&h, 7, 2).await;
    let period = Period::new(3, 2026);

    let first_run = h.ledger.generate_for_period(period).await.unwrap();
    let second_run = h.ledger.generate_for_period(period).await.unwrap();

    assert_eq!(first_run, second_run);
    assert_eq!(h.commissions.all().await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_cash_sales_generate_nothing() {
    let h = common::harness();
    h.contracts
        .insert(common::cash_contract(1, 7, "2026-03-05T09:00:00Z"))
        .await;

    let generated = h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();
    assert!(generated.is_empty());
    assert!(h.commissions.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_contracts_outside_period_are_ignored() {
    let h = common::harness();
    h.contracts
        .insert(common::contract(
            1,
            7,
            dec!(100000),
            24,
            "2026-02-15T09:00:00Z",
        ))
        .await;

    let generated = h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();
    assert!(generated.is_empty());
}

#[tokio::test]
async fn test_financed_contract_with_schedule_requires_verification() {
    let h = common::harness();
    common::seed_march_sales(&h, 7, 1).await;
    h.installments
        .insert(common::installment(10, 1, "2026-04-01", dec!(5000.00)))
        .await;

    let generated = h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();
    let children: Vec<_> = generated.iter().filter(|c| !c.is_parent()).collect();

    assert!(children.iter().all(|c| c.requires_verification));
    assert!(
        children
            .iter()
            .all(|c| c.verification == VerificationStatus::Pending)
    );

    // Nothing is payable until the client's installments are verified.
    let payable = h.ledger.get_payable(PayableFilter::default()).await.unwrap();
    assert!(payable.is_empty());
}

#[tokio::test]
async fn test_upfront_contract_is_payable_without_verification() {
    let h = common::harness();
    common::seed_march_sales(&h, 7, 1).await;

    h.ledger.generate_for_period(Period::new(3, 2026)).await.unwrap();

    let payable = h.ledger.get_payable(PayableFilter::default()).await.unwrap();
    assert_eq!(payable.len(), 2);
    assert!(
        payable
            .iter()
            .all(|c| c.verification == VerificationStatus::NotRequired)
    );
}
