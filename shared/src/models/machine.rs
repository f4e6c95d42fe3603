//! Weaving machine master data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A weaving machine on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub machine_no: i32,
    pub name: Option<String>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}
