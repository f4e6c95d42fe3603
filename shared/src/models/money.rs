//! VAT and freight cost calculations
//!
//! Korean VAT is 10%. Amounts entered VAT-inclusive are backed out by
//! dividing by 1.1; amounts entered as supply price get 10% added on.
//! All amounts are rounded to whole won, half away from zero, and the
//! breakdown always reconstructs exactly: supply + vat == total.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::order::FreightMode;

/// Supply price / VAT / total breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatBreakdown {
    pub supply: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

fn round_won(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Back a supply price out of a VAT-inclusive total
pub fn vat_from_inclusive(total: Decimal) -> VatBreakdown {
    let supply = round_won(total / Decimal::new(11, 1));
    VatBreakdown {
        supply,
        vat: total - supply,
        total,
    }
}

/// Add 10% VAT onto a supply price
pub fn vat_from_exclusive(supply: Decimal) -> VatBreakdown {
    let vat = round_won(supply * Decimal::new(1, 1));
    VatBreakdown {
        supply,
        vat,
        total: supply + vat,
    }
}

/// Line amount for a unit price and quantity, with the requested VAT
/// treatment applied.
pub fn line_amount(unit_price: Decimal, quantity: i32, vat_included: bool) -> VatBreakdown {
    let gross = unit_price * Decimal::from(quantity);
    if vat_included {
        vat_from_inclusive(gross)
    } else {
        vat_from_exclusive(gross)
    }
}

/// Allocate a freight cost across the lines of a shipment batch
pub fn allocate_freight(mode: FreightMode, cost: Decimal, line_count: usize) -> Vec<Decimal> {
    match mode {
        FreightMode::PerItem => vec![cost; line_count],
        FreightMode::Lump => {
            let mut lines = vec![Decimal::ZERO; line_count];
            if let Some(last) = lines.last_mut() {
                *last = cost;
            }
            lines
        }
    }
}
