//! Freight allocation tests
//!
//! 건당 (per item) charges the stated cost on every shipment line; 묶음
//! (lump) puts the whole cost on the last line only.

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::money::allocate_freight;
use shared::models::order::FreightMode;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn per_item_charges_every_line(cost_won in 0i64..1_000_000, lines in 1usize..50) {
        let cost = Decimal::from(cost_won);
        let allocated = allocate_freight(FreightMode::PerItem, cost, lines);

        prop_assert_eq!(allocated.len(), lines);
        for line in &allocated {
            prop_assert_eq!(*line, cost);
        }
    }

    #[test]
    fn lump_charges_only_the_last_line(cost_won in 0i64..1_000_000, lines in 1usize..50) {
        let cost = Decimal::from(cost_won);
        let allocated = allocate_freight(FreightMode::Lump, cost, lines);

        prop_assert_eq!(allocated.len(), lines);
        prop_assert_eq!(allocated[lines - 1], cost);
        let total: Decimal = allocated.iter().sum();
        prop_assert_eq!(total, cost);
    }
}

#[test]
fn lump_single_line_gets_the_whole_cost() {
    let allocated = allocate_freight(FreightMode::Lump, Decimal::from(3000), 1);
    assert_eq!(allocated, vec![Decimal::from(3000)]);
}

#[test]
fn lump_three_lines() {
    let allocated = allocate_freight(FreightMode::Lump, Decimal::from(5000), 3);
    assert_eq!(
        allocated,
        vec![Decimal::ZERO, Decimal::ZERO, Decimal::from(5000)]
    );
}

#[test]
fn per_item_three_lines() {
    let allocated = allocate_freight(FreightMode::PerItem, Decimal::from(2500), 3);
    assert_eq!(allocated, vec![Decimal::from(2500); 3]);
}

#[test]
fn freight_mode_labels() {
    assert_eq!(FreightMode::PerItem.label_ko(), "건당");
    assert_eq!(FreightMode::Lump.label_ko(), "묶음");
}
