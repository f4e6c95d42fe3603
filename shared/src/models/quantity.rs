//! Stock splitting arithmetic
//!
//! Every partial action (start sewing on part of a batch, ship part of a
//! batch) goes through `split_stock`, which enforces the conservation
//! invariant: taken + remainder always equals the quantity before the
//! split, and a split can never take more than is available.

use thiserror::Error;

/// Result of splitting a fragment's stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Quantity moved onto the child fragment
    pub taken: i32,
    /// Quantity left on the parent fragment
    pub remainder: i32,
}

impl SplitOutcome {
    /// A full take: the whole quantity advances, nothing remains
    pub fn is_full(&self) -> bool {
        self.remainder == 0
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be positive")]
    NonPositive,
    #[error("quantity {requested} exceeds available stock {available}")]
    ExceedsStock { requested: i32, available: i32 },
}

/// Split `take` units off an available stock of `available`
pub fn split_stock(available: i32, take: i32) -> Result<SplitOutcome, QuantityError> {
    if take <= 0 {
        return Err(QuantityError::NonPositive);
    }
    if take > available {
        return Err(QuantityError::ExceedsStock {
            requested: take,
            available,
        });
    }
    Ok(SplitOutcome {
        taken: take,
        remainder: available - take,
    })
}

/// Good units after removing defects, floored at zero
pub fn net_good_units(real_stock: i32, defect_qty: i32) -> i32 {
    (real_stock - defect_qty).max(0)
}

/// Ordered quantity minus what the completed rolls already produced.
///
/// Used to pre-fill the next roll's default quantity; may go negative
/// when production overshot the order.
pub fn remaining_to_produce(ordered: i32, produced_per_roll: &[i32]) -> i32 {
    ordered - produced_per_roll.iter().sum::<i32>()
}
