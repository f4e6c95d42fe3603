//! Read-only master data lookups
//!
//! Products, partners, machines and common codes are maintained outside
//! the tracker; the core only reads them (order creation snapshots
//! products, stage services validate partners and machines).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::common_code::CommonCode;
use shared::models::machine::Machine;
use shared::models::partner::{Partner, PartnerType};
use shared::models::product::Product;

/// Reference service for master data reads
#[derive(Clone)]
pub struct ReferenceService {
    db: PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    code: String,
    name: String,
    product_type: String,
    yarn_type: Option<String>,
    weight_g: Option<Decimal>,
    size: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            code: row.code,
            name: row.name,
            product_type: row.product_type,
            yarn_type: row.yarn_type,
            weight_g: row.weight_g,
            size: row.size,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PartnerRow {
    id: Uuid,
    name: String,
    partner_type: String,
    business_no: Option<String>,
    contact: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl PartnerRow {
    fn into_partner(self) -> AppResult<Partner> {
        let partner_type = PartnerType::from_str(&self.partner_type).ok_or_else(|| {
            AppError::Internal(format!("unknown partner type: {}", self.partner_type))
        })?;
        Ok(Partner {
            id: self.id,
            name: self.name,
            partner_type,
            business_no: self.business_no,
            contact: self.contact,
            address: self.address,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MachineRow {
    machine_no: i32,
    name: Option<String>,
    memo: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MachineRow> for Machine {
    fn from(row: MachineRow) -> Self {
        Machine {
            machine_no: row.machine_no,
            name: row.name,
            memo: row.memo,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommonCodeRow {
    group_code: String,
    code: String,
    label: String,
    label_ko: String,
    sort_order: i32,
}

impl From<CommonCodeRow> for CommonCode {
    fn from(row: CommonCodeRow) -> Self {
        CommonCode {
            group_code: row.group_code,
            code: row.code,
            label: row.label,
            label_ko: row.label_ko,
            sort_order: row.sort_order,
        }
    }
}

impl ReferenceService {
    /// Create a new ReferenceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a single product by code
    pub async fn get_product(&self, code: &str) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT code, name, product_type, yarn_type, weight_g, size, created_at \
             FROM products WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List the product catalogue
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT code, name, product_type, yarn_type, weight_g, size, created_at \
             FROM products ORDER BY code",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List partners, optionally filtered by what they do for us
    pub async fn list_partners(
        &self,
        partner_type: Option<PartnerType>,
    ) -> AppResult<Vec<Partner>> {
        let rows = match partner_type {
            Some(partner_type) => {
                sqlx::query_as::<_, PartnerRow>(
                    "SELECT id, name, partner_type, business_no, contact, address, created_at \
                     FROM partners WHERE partner_type = $1 ORDER BY name",
                )
                .bind(partner_type.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, PartnerRow>(
                    "SELECT id, name, partner_type, business_no, contact, address, created_at \
                     FROM partners ORDER BY partner_type, name",
                )
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(PartnerRow::into_partner).collect()
    }

    /// List the weaving machines on the floor
    pub async fn list_machines(&self) -> AppResult<Vec<Machine>> {
        let rows = sqlx::query_as::<_, MachineRow>(
            "SELECT machine_no, name, memo, created_at FROM machines ORDER BY machine_no",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Machine::from).collect())
    }

    /// List the entries of one common code group
    pub async fn list_common_codes(&self, group_code: &str) -> AppResult<Vec<CommonCode>> {
        let rows = sqlx::query_as::<_, CommonCodeRow>(
            "SELECT group_code, code, label, label_ko, sort_order \
             FROM common_codes WHERE group_code = $1 ORDER BY sort_order, code",
        )
        .bind(group_code)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CommonCode::from).collect())
    }
}
