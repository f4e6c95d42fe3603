//! Order record model
//!
//! One record represents a quantity of a specific product at a specific
//! production stage. An original customer order can fracture into several
//! fragments (weaving rolls, partial sewing batches, partial shipments),
//! each keeping its lineage through `parent_id` and the order-number
//! suffix.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::OrderStatus;

/// Order number prefix for stock injected without an originating order
pub const STOCK_PREFIX: &str = "STOCK-";

/// The central entity: an order fragment at its current stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    /// Base format `YYMM###`; weaving rolls append `-N`
    pub order_no: String,
    /// The fragment this record was split from, if any
    pub parent_id: Option<Uuid>,
    pub status: OrderStatus,
    // Product master snapshot, taken at order creation and never re-synced
    pub product_code: String,
    pub product_type: String,
    pub yarn_type: Option<String>,
    pub weight_g: Option<Decimal>,
    pub size: Option<String>,
    pub customer: String,
    /// Quantity remaining unconsumed at this fragment's current stage
    pub stock: i32,
    pub unit_price: Option<Decimal>,
    pub machine_no: Option<i32>,
    pub roll_no: Option<i32>,
    pub weaving_roll_count: Option<i32>,
    pub completed_rolls: Option<i32>,
    pub weaving: Option<WeavingData>,
    pub dyeing: Option<DyeingData>,
    pub sewing: Option<SewingData>,
    pub shipping: Option<ShippingData>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Order number as shown on screens: stock injections are masked
    pub fn display_order_no(&self) -> &str {
        if is_stock_record(&self.order_no) {
            "-"
        } else {
            &self.order_no
        }
    }
}

/// Weaving-stage data, filled in as rolls are produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeavingData {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Actually produced quantity for this roll
    pub real_stock: Option<i32>,
    pub real_weight_kg: Option<Decimal>,
    pub prod_weight_kg: Option<Decimal>,
    pub avg_weight_kg: Option<Decimal>,
}

/// Dyeing-stage data: out to the dye house, back in with costs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DyeingData {
    pub partner: String,
    pub out_date: NaiveDate,
    pub out_weight_kg: Option<Decimal>,
    pub in_date: Option<NaiveDate>,
    pub in_weight_kg: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub vat_included: Option<bool>,
    pub color_code: Option<String>,
    pub color_name: Option<String>,
}

/// Internal or external sewing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SewingType {
    Internal,
    External,
}

impl SewingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SewingType::Internal => "internal",
            SewingType::External => "external",
        }
    }
}

/// Sewing-stage data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SewingData {
    pub partner: Option<String>,
    pub sewing_type: SewingType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Completed count before defects are removed
    pub real_stock: Option<i32>,
    pub defect_qty: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub amount: Option<Decimal>,
}

/// How freight cost is applied across a shipment batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreightMode {
    /// 건당: the stated cost on every line item
    PerItem,
    /// 묶음: the whole cost on the last line item only
    Lump,
}

impl FreightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreightMode::PerItem => "per_item",
            FreightMode::Lump => "lump",
        }
    }

    pub fn label_ko(&self) -> &'static str {
        match self {
            FreightMode::PerItem => "건당",
            FreightMode::Lump => "묶음",
        }
    }
}

/// Shipping-stage data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingData {
    pub date: NaiveDate,
    pub method: Option<String>,
    pub carrier: Option<String>,
    pub freight_cost: Option<Decimal>,
    pub freight_mode: Option<FreightMode>,
    pub delivery_to: Option<String>,
    pub delivery_contact: Option<String>,
    pub delivery_address: Option<String>,
}

/// Generate a base order number: YYMM###
pub fn generate_order_no(year: i32, month: u32, sequence: i32) -> String {
    format!("{:02}{:02}{:03}", year % 100, month, sequence)
}

/// Order number for a completed weaving roll: base-N
pub fn roll_order_no(base: &str, roll_no: i32) -> String {
    format!("{}-{}", base, roll_no)
}

/// Strip the roll suffix to recover the base order number.
///
/// Stock injections have no base order; they are returned unchanged.
pub fn base_order_no(order_no: &str) -> &str {
    if is_stock_record(order_no) {
        return order_no;
    }
    order_no.split('-').next().unwrap_or(order_no)
}

/// Whether this order number marks stock held without an originating order
pub fn is_stock_record(order_no: &str) -> bool {
    order_no.starts_with(STOCK_PREFIX)
}

/// Next roll number for a weaving parent: one past the highest surviving
/// roll. Canceling a low-numbered roll leaves a gap; a number is never
/// reissued while a sibling still carries it.
pub fn next_roll_no(existing_rolls: &[i32]) -> i32 {
    existing_rolls.iter().copied().max().unwrap_or(0) + 1
}

/// Whether a dyed fragment can absorb a canceled sewing fragment's
/// quantity: same base order number, same product, same dye color.
pub fn is_merge_sibling(
    order_no: &str,
    product_code: &str,
    color_code: Option<&str>,
    sibling_order_no: &str,
    sibling_product_code: &str,
    sibling_color_code: Option<&str>,
) -> bool {
    base_order_no(order_no) == base_order_no(sibling_order_no)
        && product_code == sibling_product_code
        && color_code == sibling_color_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record_with_order_no(order_no: &str) -> OrderRecord {
        OrderRecord {
            id: Uuid::new_v4(),
            order_no: order_no.to_string(),
            parent_id: None,
            status: OrderStatus::Sewn,
            product_code: "TW-001".to_string(),
            product_type: "towel".to_string(),
            yarn_type: None,
            weight_g: None,
            size: None,
            customer: String::new(),
            stock: 100,
            unit_price: None,
            machine_no: None,
            roll_no: None,
            weaving_roll_count: None,
            completed_rolls: None,
            weaving: None,
            dyeing: None,
            sewing: None,
            shipping: None,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stock_injections_are_masked_on_display() {
        let stock = record_with_order_no("STOCK-0001");
        assert_eq!(stock.display_order_no(), "-");

        let normal = record_with_order_no("2608001");
        assert_eq!(normal.display_order_no(), "2608001");
    }

    #[test]
    fn roll_numbers_resolve_to_their_base() {
        assert_eq!(base_order_no("2608001-3"), "2608001");
        assert_eq!(base_order_no("2608001"), "2608001");
        assert_eq!(base_order_no("STOCK-0001"), "STOCK-0001");
    }
}
