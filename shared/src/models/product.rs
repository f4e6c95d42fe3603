//! Product master data
//!
//! Read-only reference from the core's perspective; order records take a
//! snapshot of these fields at creation time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the master catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub product_type: String,
    pub yarn_type: Option<String>,
    pub weight_g: Option<Decimal>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
}
