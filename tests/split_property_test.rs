use commission_engine::domain::split;
use rand::Rng;
use rust_decimal::Decimal;

#[test]
fn test_children_sum_to_parent_for_random_amounts() {
    let mut rng = rand::thread_rng();

    for _ in 0..10_000 {
        // Up to four decimal places, the precision unrounded gross amounts
        // can carry out of the calculator.
        let cents: i64 = rng.gen_range(0..=10_000_000_000);
        let gross = Decimal::new(cents, 4);
        let sales_count = rng.gen_range(0..=20);

        let split = split::allocate(gross, sales_count);
        assert_eq!(
            split.first + split.second,
            split.parent,
            "gross {gross} at count {sales_count}"
        );
        assert_eq!(split.parent, split::round2(gross));
        assert!(split.first >= Decimal::ZERO);
        assert!(split.second >= Decimal::ZERO);
    }
}
