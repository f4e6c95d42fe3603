//! Stock splitting tests
//!
//! Every partial action (sewing start, shipment line) goes through the
//! same split arithmetic; these properties pin down conservation.

use proptest::prelude::*;

use shared::models::quantity::{
    net_good_units, remaining_to_produce, split_stock, QuantityError,
};

// ============================================================================
// Conservation: taken + remainder always equals the stock before the split
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn split_conserves_total(available in 1i32..100_000, take in 1i32..100_000) {
        match split_stock(available, take) {
            Ok(outcome) => {
                prop_assert!(take <= available);
                prop_assert_eq!(outcome.taken, take);
                prop_assert_eq!(outcome.taken + outcome.remainder, available);
                prop_assert!(outcome.remainder >= 0);
            }
            Err(QuantityError::ExceedsStock { requested, available: avail }) => {
                prop_assert!(take > available);
                prop_assert_eq!(requested, take);
                prop_assert_eq!(avail, available);
            }
            Err(QuantityError::NonPositive) => {
                prop_assert!(false, "positive take reported as non-positive");
            }
        }
    }

    #[test]
    fn split_never_creates_stock(available in 1i32..100_000, take in 1i32..100_000) {
        if let Ok(outcome) = split_stock(available, take) {
            prop_assert!(outcome.taken <= available);
            prop_assert!(outcome.remainder <= available);
        }
    }

    #[test]
    fn full_take_leaves_nothing(available in 1i32..100_000) {
        let outcome = split_stock(available, available).unwrap();
        prop_assert!(outcome.is_full());
        prop_assert_eq!(outcome.taken, available);
        prop_assert_eq!(outcome.remainder, 0);
    }

    #[test]
    fn non_positive_take_is_rejected(available in 0i32..100_000, take in -100_000i32..=0) {
        prop_assert_eq!(split_stock(available, take), Err(QuantityError::NonPositive));
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[test]
fn split_exceeding_stock_is_rejected() {
    assert_eq!(
        split_stock(10, 11),
        Err(QuantityError::ExceedsStock {
            requested: 11,
            available: 10
        })
    );
}

#[test]
fn partial_split_keeps_remainder() {
    let outcome = split_stock(100, 30).unwrap();
    assert_eq!(outcome.taken, 30);
    assert_eq!(outcome.remainder, 70);
    assert!(!outcome.is_full());
}

#[test]
fn net_good_units_subtracts_defects() {
    assert_eq!(net_good_units(100, 3), 97);
    assert_eq!(net_good_units(100, 0), 100);
}

#[test]
fn net_good_units_floors_at_zero() {
    assert_eq!(net_good_units(2, 5), 0);
}

#[test]
fn remaining_to_produce_tracks_rolls() {
    assert_eq!(remaining_to_produce(1000, &[]), 1000);
    assert_eq!(remaining_to_produce(1000, &[300, 350]), 350);
}

#[test]
fn remaining_to_produce_can_go_negative_on_overshoot() {
    assert_eq!(remaining_to_produce(1000, &[600, 500]), -100);
}
