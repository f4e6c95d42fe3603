//! Partner master data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a partner does for us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerType {
    Customer,
    Dyeing,
    Sewing,
    Carrier,
}

impl PartnerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerType::Customer => "customer",
            PartnerType::Dyeing => "dyeing",
            PartnerType::Sewing => "sewing",
            PartnerType::Carrier => "carrier",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(PartnerType::Customer),
            "dyeing" => Some(PartnerType::Dyeing),
            "sewing" => Some(PartnerType::Sewing),
            "carrier" => Some(PartnerType::Carrier),
            _ => None,
        }
    }
}

/// A business partner (customer, dye house, sewing shop, carrier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub partner_type: PartnerType,
    /// 사업자등록번호
    pub business_no: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
