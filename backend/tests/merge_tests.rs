//! Merge-on-cancel tests
//!
//! Canceling a sewing run puts the quantity back into a dyed sibling when
//! one exists. A sibling qualifies only on all three keys at once: same
//! base order number, same product, same dye color.

use proptest::prelude::*;

use shared::models::order::is_merge_sibling;
use shared::models::quantity::split_stock;

// ============================================================================
// Sibling matching: base order + product + color, all three required
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn sibling_match_is_symmetric(
        seq_a in 1i32..1000,
        seq_b in 1i32..1000,
        same_product in any::<bool>(),
        same_color in any::<bool>(),
    ) {
        let order_a = format!("2608{:03}", seq_a);
        let order_b = format!("2608{:03}-2", seq_b);
        let (product_a, product_b) = if same_product {
            ("TW-001", "TW-001")
        } else {
            ("TW-001", "TW-002")
        };
        let (color_a, color_b) = if same_color {
            (Some("WH"), Some("WH"))
        } else {
            (Some("WH"), Some("BK"))
        };

        let forward = is_merge_sibling(&order_a, product_a, color_a, &order_b, product_b, color_b);
        let backward = is_merge_sibling(&order_b, product_b, color_b, &order_a, product_a, color_a);
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward, seq_a == seq_b && same_product && same_color);
    }

    /// Splitting for sewing and merging back on cancel restores the
    /// sibling's original stock exactly.
    #[test]
    fn split_then_merge_restores_stock(available in 2i32..100_000, take in 1i32..100_000) {
        prop_assume!(take < available);
        let split = split_stock(available, take).unwrap();

        // The remainder stays dyed; canceling adds the taken quantity back
        let merged = split.remainder + split.taken;
        prop_assert_eq!(merged, available);
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[test]
fn roll_fragments_merge_across_suffixes() {
    // A roll fragment and the unsuffixed remainder share a base order
    assert!(is_merge_sibling(
        "2608001-2",
        "TW-001",
        Some("WH"),
        "2608001",
        "TW-001",
        Some("WH"),
    ));
    assert!(is_merge_sibling(
        "2608001-2",
        "TW-001",
        Some("WH"),
        "2608001-3",
        "TW-001",
        Some("WH"),
    ));
}

#[test]
fn different_base_order_never_merges() {
    assert!(!is_merge_sibling(
        "2608001-1",
        "TW-001",
        Some("WH"),
        "2608002-1",
        "TW-001",
        Some("WH"),
    ));
}

#[test]
fn different_product_never_merges() {
    assert!(!is_merge_sibling(
        "2608001-1",
        "TW-001",
        Some("WH"),
        "2608001-2",
        "TW-002",
        Some("WH"),
    ));
}

#[test]
fn different_color_never_merges() {
    assert!(!is_merge_sibling(
        "2608001-1",
        "TW-001",
        Some("WH"),
        "2608001-2",
        "TW-001",
        Some("BK"),
    ));
    // Undyed and dyed never mix
    assert!(!is_merge_sibling(
        "2608001-1",
        "TW-001",
        Some("WH"),
        "2608001-2",
        "TW-001",
        None,
    ));
}

#[test]
fn matching_undyed_color_merges() {
    assert!(is_merge_sibling(
        "2608001-1",
        "TW-001",
        None,
        "2608001-2",
        "TW-001",
        None,
    ));
}

#[test]
fn only_the_full_key_matches_among_candidates() {
    // One canceled fragment against a spread of dyed candidates: exactly
    // one qualifies
    let canceled = ("2608001-2", "TW-001", Some("WH"));
    let candidates = [
        ("2608001", "TW-001", Some("BK")),
        ("2608001", "TW-002", Some("WH")),
        ("2608002", "TW-001", Some("WH")),
        ("2608001-3", "TW-001", Some("WH")),
    ];

    let matches: Vec<_> = candidates
        .iter()
        .filter(|(o, p, c)| is_merge_sibling(canceled.0, canceled.1, canceled.2, o, p, *c))
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].0, "2608001-3");
}
