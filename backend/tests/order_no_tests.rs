//! Order numbering tests
//!
//! Base numbers are YYMM###, weaving rolls append -N, and stock injected
//! without an originating order carries the reserved STOCK- prefix and is
//! masked on screens.

use proptest::prelude::*;

use shared::models::order::{
    base_order_no, generate_order_no, is_stock_record, next_roll_no, roll_order_no, STOCK_PREFIX,
};
use shared::validation::validate_order_no;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn generated_numbers_validate(
        year in 2000i32..2100,
        month in 1u32..=12,
        seq in 1i32..1000,
    ) {
        let order_no = generate_order_no(year, month, seq);
        prop_assert_eq!(order_no.len(), 7);
        prop_assert!(validate_order_no(&order_no).is_ok());
    }

    #[test]
    fn next_roll_never_collides_with_a_survivor(
        rolls in proptest::collection::vec(1i32..100, 0..10),
    ) {
        let next = next_roll_no(&rolls);
        prop_assert!(rolls.iter().all(|r| *r != next));
        prop_assert!(next >= 1);
    }

    #[test]
    fn roll_suffix_strips_back_to_base(
        year in 2000i32..2100,
        month in 1u32..=12,
        seq in 1i32..1000,
        roll_no in 1i32..100,
    ) {
        let base = generate_order_no(year, month, seq);
        let roll = roll_order_no(&base, roll_no);

        prop_assert!(roll.starts_with(&base));
        prop_assert_eq!(base_order_no(&roll), base.as_str());
    }
}

#[test]
fn generate_order_no_format() {
    assert_eq!(generate_order_no(2026, 8, 1), "2608001");
    assert_eq!(generate_order_no(2026, 8, 42), "2608042");
    assert_eq!(generate_order_no(2025, 12, 999), "2512999");
}

#[test]
fn roll_order_no_format() {
    assert_eq!(roll_order_no("2608001", 1), "2608001-1");
    assert_eq!(roll_order_no("2608001", 12), "2608001-12");
}

#[test]
fn base_order_no_on_unsuffixed_number() {
    assert_eq!(base_order_no("2608001"), "2608001");
}

#[test]
fn next_roll_no_starts_at_one() {
    assert_eq!(next_roll_no(&[]), 1);
    assert_eq!(next_roll_no(&[1]), 2);
}

#[test]
fn canceling_a_low_roll_does_not_reissue_a_live_number() {
    // Rolls 1..=3 completed, roll 1 canceled: rolls 2 and 3 survive.
    // The next roll must take 4, not collide with the live roll 3.
    assert_eq!(next_roll_no(&[2, 3]), 4);
}

#[test]
fn stock_numbers_are_recognized_and_kept_whole() {
    let stock_no = format!("{}0001", STOCK_PREFIX);
    assert!(is_stock_record(&stock_no));
    // The hyphen in the prefix is not a roll suffix
    assert_eq!(base_order_no(&stock_no), stock_no.as_str());
    assert!(!is_stock_record("2608001"));
}

#[test]
fn validate_order_no_rejects_bad_shapes() {
    assert!(validate_order_no("2608001").is_ok());
    assert!(validate_order_no("260801").is_err());
    assert!(validate_order_no("26080011").is_err());
    assert!(validate_order_no("2613001").is_err());
    assert!(validate_order_no("26o8001").is_err());
}
