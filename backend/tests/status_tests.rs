//! Production status machine tests
//!
//! The pipeline only moves along explicit forward edges, and every cancel
//! walks back exactly one step.

use proptest::prelude::*;

use shared::models::status::OrderStatus;

fn pipeline_position(status: OrderStatus) -> usize {
    OrderStatus::ALL
        .iter()
        .position(|s| *s == status)
        .expect("status in ALL")
}

// ============================================================================
// Forward edges: no skipping, no backward advance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn advance_never_moves_backward(
        from_idx in 0usize..10,
        to_idx in 0usize..10,
    ) {
        let from = OrderStatus::ALL[from_idx];
        let to = OrderStatus::ALL[to_idx];

        if from.can_advance_to(to) {
            prop_assert!(pipeline_position(to) > pipeline_position(from));
        }
    }

    #[test]
    fn revert_undoes_exactly_one_advance(idx in 0usize..10) {
        let status = OrderStatus::ALL[idx];

        if let Some(target) = status.revert_target() {
            // Reverting always lands on a status that could advance back here
            prop_assert!(target.can_advance_to(status));
        } else {
            prop_assert_eq!(status, OrderStatus::Received);
        }
    }

    #[test]
    fn status_round_trips_through_db_string(idx in 0usize..10) {
        let status = OrderStatus::ALL[idx];
        prop_assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[test]
fn full_forward_chain_is_legal() {
    use OrderStatus::*;
    let chain = [
        Received,
        WeavingQueued,
        Weaving,
        WeavingDone,
        Dyeing,
        Dyed,
        Sewing,
        Sewn,
        Shipped,
    ];
    for pair in chain.windows(2) {
        assert!(
            pair[0].can_advance_to(pair[1]),
            "{} -> {} must be legal",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn no_stage_skipping() {
    use OrderStatus::*;
    assert!(!Received.can_advance_to(Weaving));
    assert!(!WeavingQueued.can_advance_to(WeavingDone));
    assert!(!WeavingDone.can_advance_to(Dyed));
    assert!(!Dyed.can_advance_to(Sewn));
    assert!(!Received.can_advance_to(Shipped));
}

#[test]
fn master_edge_only_from_weaving() {
    use OrderStatus::*;
    assert!(Weaving.can_advance_to(WeavingMaster));
    for status in OrderStatus::ALL {
        if status != Weaving {
            assert!(!status.can_advance_to(WeavingMaster), "{} -> master", status);
        }
    }
}

#[test]
fn master_never_advances() {
    for status in OrderStatus::ALL {
        assert!(!OrderStatus::WeavingMaster.can_advance_to(status));
    }
}

#[test]
fn terminal_never_advances() {
    assert!(OrderStatus::Shipped.is_terminal());
    for status in OrderStatus::ALL {
        assert!(!OrderStatus::Shipped.can_advance_to(status));
    }
}

#[test]
fn received_has_no_revert() {
    assert_eq!(OrderStatus::Received.revert_target(), None);
}

#[test]
fn master_reverts_to_weaving() {
    assert_eq!(
        OrderStatus::WeavingMaster.revert_target(),
        Some(OrderStatus::Weaving)
    );
}

#[test]
fn after_roll_completion_holds_until_last_roll() {
    assert_eq!(
        OrderStatus::after_roll_completion(1, 3),
        OrderStatus::Weaving
    );
    assert_eq!(
        OrderStatus::after_roll_completion(2, 3),
        OrderStatus::Weaving
    );
    assert_eq!(
        OrderStatus::after_roll_completion(3, 3),
        OrderStatus::WeavingMaster
    );
}

#[test]
fn only_in_progress_weaving_occupies_a_machine() {
    // Machine exclusivity hinges on exactly one status holding the
    // machine; queued work and finished rolls must not block it
    for status in OrderStatus::ALL {
        assert_eq!(
            status.occupies_machine(),
            status == OrderStatus::Weaving,
            "{} occupancy",
            status
        );
    }
}

#[test]
fn korean_labels_cover_every_status() {
    for status in OrderStatus::ALL {
        assert!(!status.label_ko().is_empty());
    }
    assert_eq!(OrderStatus::Received.label_ko(), "발주접수");
    assert_eq!(OrderStatus::WeavingMaster.label_ko(), "제직완료(Master)");
    assert_eq!(OrderStatus::Shipped.label_ko(), "출고완료");
}
