//! VAT calculation tests
//!
//! Korean VAT is 10%, amounts settle in whole won. The breakdown must
//! always reconstruct exactly: supply + vat == total.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::money::{line_amount, vat_from_exclusive, vat_from_inclusive};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Breakdown reconstruction: supply + vat == total, both directions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn inclusive_breakdown_reconstructs(total_won in 1i64..1_000_000_000) {
        let total = Decimal::from(total_won);
        let breakdown = vat_from_inclusive(total);

        prop_assert_eq!(breakdown.supply + breakdown.vat, breakdown.total);
        prop_assert_eq!(breakdown.total, total);
        prop_assert!(breakdown.supply <= total);
    }

    #[test]
    fn exclusive_breakdown_reconstructs(supply_won in 1i64..1_000_000_000) {
        let supply = Decimal::from(supply_won);
        let breakdown = vat_from_exclusive(supply);

        prop_assert_eq!(breakdown.supply + breakdown.vat, breakdown.total);
        prop_assert_eq!(breakdown.supply, supply);
        prop_assert!(breakdown.vat >= Decimal::ZERO);
    }

    #[test]
    fn exclusive_vat_is_about_ten_percent(supply_won in 100i64..1_000_000_000) {
        let supply = Decimal::from(supply_won);
        let breakdown = vat_from_exclusive(supply);

        // Rounded to whole won, so at most half a won off
        let exact = supply * dec("0.1");
        let diff = (breakdown.vat - exact).abs();
        prop_assert!(diff <= dec("0.5"), "vat {} too far from {}", breakdown.vat, exact);
    }

    #[test]
    fn line_amount_matches_direction(
        price_won in 1i64..1_000_000,
        qty in 1i32..10_000,
        vat_included in any::<bool>(),
    ) {
        let price = Decimal::from(price_won);
        let breakdown = line_amount(price, qty, vat_included);
        let gross = price * Decimal::from(qty);

        prop_assert_eq!(breakdown.supply + breakdown.vat, breakdown.total);
        if vat_included {
            prop_assert_eq!(breakdown.total, gross);
        } else {
            prop_assert_eq!(breakdown.supply, gross);
        }
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[test]
fn inclusive_110_000_splits_cleanly() {
    let breakdown = vat_from_inclusive(dec("110000"));
    assert_eq!(breakdown.supply, dec("100000"));
    assert_eq!(breakdown.vat, dec("10000"));
    assert_eq!(breakdown.total, dec("110000"));
}

#[test]
fn exclusive_100_000_adds_ten_percent() {
    let breakdown = vat_from_exclusive(dec("100000"));
    assert_eq!(breakdown.supply, dec("100000"));
    assert_eq!(breakdown.vat, dec("10000"));
    assert_eq!(breakdown.total, dec("110000"));
}

#[test]
fn inclusive_rounding_half_away_from_zero() {
    // 1000 / 1.1 = 909.0909... rounds to 909; vat carries the difference
    let breakdown = vat_from_inclusive(dec("1000"));
    assert_eq!(breakdown.supply, dec("909"));
    assert_eq!(breakdown.vat, dec("91"));
    assert_eq!(breakdown.supply + breakdown.vat, dec("1000"));
}

#[test]
fn line_amount_external_sewing_example() {
    // 500 won per unit, 200 units, price entered without VAT
    let breakdown = line_amount(dec("500"), 200, false);
    assert_eq!(breakdown.supply, dec("100000"));
    assert_eq!(breakdown.vat, dec("10000"));
    assert_eq!(breakdown.total, dec("110000"));
}
