//! Common code tables (shipping methods, color codes, ...)

use serde::{Deserialize, Serialize};

/// Code groups used by the core
pub mod groups {
    pub const SHIPPING_METHOD: &str = "shipping_method";
    pub const COLOR: &str = "color";
}

/// One entry of a common code lookup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonCode {
    pub group_code: String,
    pub code: String,
    pub label: String,
    pub label_ko: String,
    pub sort_order: i32,
}
