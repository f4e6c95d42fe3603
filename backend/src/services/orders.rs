//! Order management service: creation, lookup, weaving queue flips
//!
//! Also home to the row mapping and fragment-insert helpers every other
//! stage service builds on.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::order::{
    generate_order_no, DyeingData, OrderRecord, SewingData, ShippingData, WeavingData,
};
use shared::models::status::OrderStatus;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_order_no, validate_positive_qty};

/// Column list shared by every query that loads a full order record
pub(crate) const ORDER_COLUMNS: &str = "id, order_no, parent_id, status, product_code, \
     product_type, yarn_type, weight_g, size, customer, stock, unit_price, machine_no, \
     roll_no, weaving_roll_count, completed_rolls, weaving, dyeing, sewing, shipping, \
     note, created_at, updated_at";

/// Database row for an order record
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    id: Uuid,
    order_no: String,
    parent_id: Option<Uuid>,
    status: String,
    product_code: String,
    product_type: String,
    yarn_type: Option<String>,
    weight_g: Option<Decimal>,
    size: Option<String>,
    customer: String,
    stock: i32,
    unit_price: Option<Decimal>,
    machine_no: Option<i32>,
    roll_no: Option<i32>,
    weaving_roll_count: Option<i32>,
    completed_rolls: Option<i32>,
    weaving: Option<serde_json::Value>,
    dyeing: Option<serde_json::Value>,
    sewing: Option<serde_json::Value>,
    shipping: Option<serde_json::Value>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_stage<T: serde::de::DeserializeOwned>(
    value: Option<serde_json::Value>,
) -> AppResult<Option<T>> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Internal(format!("corrupt stage payload: {}", e)))
}

impl OrderRow {
    pub(crate) fn into_record(self) -> AppResult<OrderRecord> {
        let status = OrderStatus::from_str(&self.status)
            .ok_or_else(|| AppError::Internal(format!("unknown order status: {}", self.status)))?;
        Ok(OrderRecord {
            id: self.id,
            order_no: self.order_no,
            parent_id: self.parent_id,
            status,
            product_code: self.product_code,
            product_type: self.product_type,
            yarn_type: self.yarn_type,
            weight_g: self.weight_g,
            size: self.size,
            customer: self.customer,
            stock: self.stock,
            unit_price: self.unit_price,
            machine_no: self.machine_no,
            roll_no: self.roll_no,
            weaving_roll_count: self.weaving_roll_count,
            completed_rolls: self.completed_rolls,
            weaving: parse_stage::<WeavingData>(self.weaving)?,
            dyeing: parse_stage::<DyeingData>(self.dyeing)?,
            sewing: parse_stage::<SewingData>(self.sewing)?,
            shipping: parse_stage::<ShippingData>(self.shipping)?,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load an order record, plain read. `NotFound` when absent.
pub(crate) async fn fetch_order(db: &PgPool, order_id: Uuid) -> AppResult<OrderRecord> {
    let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
    sqlx::query_as::<_, OrderRow>(&sql)
        .bind(order_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?
        .into_record()
}

/// Load and lock an order record inside a transaction, for a mutation the
/// caller is about to make. `StaleRecord` when the id no longer resolves:
/// the caller was looking at a list that is out of date.
pub(crate) async fn lock_order(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> AppResult<OrderRecord> {
    let sql = format!(
        "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
        ORDER_COLUMNS
    );
    sqlx::query_as::<_, OrderRow>(&sql)
        .bind(order_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::StaleRecord("Order".to_string()))?
        .into_record()
}

/// A record to insert, cloned from a parent with a subset of fields
/// overridden (the "clone with override" every split uses).
#[derive(Debug, Clone)]
pub(crate) struct NewFragment {
    pub order_no: String,
    pub parent_id: Option<Uuid>,
    pub status: OrderStatus,
    pub product_code: String,
    pub product_type: String,
    pub yarn_type: Option<String>,
    pub weight_g: Option<Decimal>,
    pub size: Option<String>,
    pub customer: String,
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
}

impl NewFragment {
    /// Start from a full copy of the parent; the caller overrides what the
    /// split changes (stock, status, parent_id, stage payloads).
    pub(crate) fn cloned_from(parent: &OrderRecord) -> Self {
        Self {
            order_no: parent.order_no.clone(),
            parent_id: parent.parent_id,
            status: parent.status,
            product_code: parent.product_code.clone(),
            product_type: parent.product_type.clone(),
            yarn_type: parent.yarn_type.clone(),
            weight_g: parent.weight_g,
            size: parent.size.clone(),
            customer: parent.customer.clone(),
            stock: parent.stock,
            unit_price: parent.unit_price,
            machine_no: parent.machine_no,
            roll_no: parent.roll_no,
            weaving_roll_count: None,
            completed_rolls: None,
            weaving: parent.weaving.clone(),
            dyeing: parent.dyeing.clone(),
            sewing: parent.sewing.clone(),
            shipping: parent.shipping.clone(),
            note: parent.note.clone(),
        }
    }
}

fn stage_json<T: Serialize>(data: &Option<T>) -> AppResult<Option<serde_json::Value>> {
    data.as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Insert a fragment inside a transaction and return the stored record
pub(crate) async fn insert_fragment(
    tx: &mut Transaction<'_, Postgres>,
    fragment: &NewFragment,
) -> AppResult<OrderRecord> {
    let sql = format!(
        r#"
        INSERT INTO orders (
            order_no, parent_id, status, product_code, product_type, yarn_type,
            weight_g, size, customer, stock, unit_price, machine_no, roll_no,
            weaving_roll_count, completed_rolls, weaving, dyeing, sewing, shipping, note
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING {}
        "#,
        ORDER_COLUMNS
    );
    sqlx::query_as::<_, OrderRow>(&sql)
        .bind(&fragment.order_no)
        .bind(fragment.parent_id)
        .bind(fragment.status.as_str())
        .bind(&fragment.product_code)
        .bind(&fragment.product_type)
        .bind(&fragment.yarn_type)
        .bind(fragment.weight_g)
        .bind(&fragment.size)
        .bind(&fragment.customer)
        .bind(fragment.stock)
        .bind(fragment.unit_price)
        .bind(fragment.machine_no)
        .bind(fragment.roll_no)
        .bind(fragment.weaving_roll_count)
        .bind(fragment.completed_rolls)
        .bind(stage_json(&fragment.weaving)?)
        .bind(stage_json(&fragment.dyeing)?)
        .bind(stage_json(&fragment.sewing)?)
        .bind(stage_json(&fragment.shipping)?)
        .bind(&fragment.note)
        .fetch_one(&mut **tx)
        .await?
        .into_record()
}

/// Persist a record's mutable stage state back to its row (status, stock,
/// counters and payloads; the snapshot columns never change after create).
pub(crate) async fn store_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &OrderRecord,
) -> AppResult<OrderRecord> {
    let sql = format!(
        r#"
        UPDATE orders
        SET status = $2, stock = $3, unit_price = $4, machine_no = $5, roll_no = $6,
            weaving_roll_count = $7, completed_rolls = $8,
            weaving = $9, dyeing = $10, sewing = $11, shipping = $12, note = $13
        WHERE id = $1
        RETURNING {}
        "#,
        ORDER_COLUMNS
    );
    sqlx::query_as::<_, OrderRow>(&sql)
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(record.stock)
        .bind(record.unit_price)
        .bind(record.machine_no)
        .bind(record.roll_no)
        .bind(record.weaving_roll_count)
        .bind(record.completed_rolls)
        .bind(stage_json(&record.weaving)?)
        .bind(stage_json(&record.dyeing)?)
        .bind(stage_json(&record.sewing)?)
        .bind(stage_json(&record.shipping)?)
        .bind(&record.note)
        .fetch_one(&mut **tx)
        .await?
        .into_record()
}

/// Flip a record's status in place, guarded on the expected current
/// status. Zero rows affected is disambiguated into stale-record vs
/// invalid-transition.
pub(crate) async fn flip_status(
    db: &PgPool,
    order_id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
) -> AppResult<OrderRecord> {
    let sql = format!(
        "UPDATE orders SET status = $3 WHERE id = $1 AND status = $2 RETURNING {}",
        ORDER_COLUMNS
    );
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(order_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(db)
        .await?;

    match row {
        Some(row) => row.into_record(),
        None => Err(transition_failure(db, order_id, from).await?),
    }
}

/// Work out why a guarded status update matched nothing
pub(crate) async fn transition_failure(
    db: &PgPool,
    order_id: Uuid,
    expected: OrderStatus,
) -> AppResult<AppError> {
    let current = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(db)
        .await?;

    Ok(match current {
        None => AppError::StaleRecord("Order".to_string()),
        Some(status) => AppError::InvalidStateTransition(format!(
            "order must be in status {}, currently {}",
            expected.as_str(),
            status
        )),
    })
}

/// Order service for creating and reading orders and working the
/// weaving queue
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub product_code: String,
    pub customer: String,
    pub qty: i32,
    /// Manual order number; generated from the monthly counter when absent
    pub order_no: Option<String>,
    pub note: Option<String>,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Allocate the next base order number for the current month: YYMM###
    async fn next_order_no(&self, tx: &mut Transaction<'_, Postgres>) -> AppResult<String> {
        let now = Utc::now();
        let year_month = format!("{:02}{:02}", now.year() % 100, now.month());

        let sequence: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO order_counters (counter_key, last_seq)
            VALUES ($1, 1)
            ON CONFLICT (counter_key) DO UPDATE SET last_seq = order_counters.last_seq + 1
            RETURNING last_seq
            "#,
        )
        .bind(&year_month)
        .fetch_one(&mut **tx)
        .await?;

        Ok(generate_order_no(now.year(), now.month(), sequence))
    }

    /// Create a new order, snapshotting product master data
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<OrderRecord> {
        if input.customer.trim().is_empty() {
            return Err(AppError::Validation {
                field: "customer".to_string(),
                message: "Customer is required".to_string(),
                message_ko: "거래처를 선택해주세요".to_string(),
            });
        }
        if input.product_code.trim().is_empty() {
            return Err(AppError::Validation {
                field: "product_code".to_string(),
                message: "Product is required".to_string(),
                message_ko: "제품을 선택해주세요".to_string(),
            });
        }
        if let Err(msg) = validate_positive_qty(input.qty) {
            return Err(AppError::Validation {
                field: "qty".to_string(),
                message: msg.to_string(),
                message_ko: "수량은 1 이상이어야 합니다".to_string(),
            });
        }

        // Snapshot the product master. Never re-synced if the master
        // changes later.
        let product = sqlx::query_as::<_, (String, Option<String>, Option<Decimal>, Option<String>)>(
            "SELECT product_type, yarn_type, weight_g, size FROM products WHERE code = $1",
        )
        .bind(&input.product_code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM partners WHERE name = $1 AND partner_type = 'customer')",
        )
        .bind(&input.customer)
        .fetch_one(&self.db)
        .await?;
        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let order_no = match &input.order_no {
            Some(manual) => {
                if let Err(msg) = validate_order_no(manual) {
                    return Err(AppError::Validation {
                        field: "order_no".to_string(),
                        message: msg.to_string(),
                        message_ko: "발주번호 형식이 올바르지 않습니다 (YYMM###)".to_string(),
                    });
                }
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM orders WHERE order_no = $1)",
                )
                .bind(manual)
                .fetch_one(&mut *tx)
                .await?;
                if exists {
                    return Err(AppError::DuplicateEntry("order number".to_string()));
                }
                manual.clone()
            }
            None => self.next_order_no(&mut tx).await?,
        };

        let fragment = NewFragment {
            order_no,
            parent_id: None,
            status: OrderStatus::Received,
            product_code: input.product_code.clone(),
            product_type: product.0,
            yarn_type: product.1,
            weight_g: product.2,
            size: product.3,
            customer: input.customer.clone(),
            stock: input.qty,
            unit_price: None,
            machine_no: None,
            roll_no: None,
            weaving_roll_count: None,
            completed_rolls: None,
            weaving: None,
            dyeing: None,
            sewing: None,
            shipping: None,
            note: input.note.clone(),
        };
        let record = insert_fragment(&mut tx, &fragment).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Get a single order record
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        fetch_order(&self.db, order_id).await
    }

    /// List order records, optionally filtered by status, newest first
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<OrderRecord>> {
        let pagination = pagination.sanitized();

        let (rows, total) = match status {
            Some(status) => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
                        .bind(status.as_str())
                        .fetch_one(&self.db)
                        .await?;
                let sql = format!(
                    "SELECT {} FROM orders WHERE status = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                    ORDER_COLUMNS
                );
                let rows = sqlx::query_as::<_, OrderRow>(&sql)
                    .bind(status.as_str())
                    .bind(pagination.limit())
                    .bind(pagination.offset())
                    .fetch_all(&self.db)
                    .await?;
                (rows, total)
            }
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
                    .fetch_one(&self.db)
                    .await?;
                let sql = format!(
                    "SELECT {} FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                    ORDER_COLUMNS
                );
                let rows = sqlx::query_as::<_, OrderRow>(&sql)
                    .bind(pagination.limit())
                    .bind(pagination.offset())
                    .fetch_all(&self.db)
                    .await?;
                (rows, total)
            }
        };

        let data = rows
            .into_iter()
            .map(OrderRow::into_record)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// Update the free-text note on an order
    pub async fn update_note(&self, order_id: Uuid, note: Option<String>) -> AppResult<OrderRecord> {
        let sql = format!(
            "UPDATE orders SET note = $2 WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        );
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .bind(&note)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?
            .into_record()
    }

    /// Delete an order (admin flow). Refused while fragments still
    /// reference it as their parent.
    pub async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        let has_children = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE parent_id = $1)",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;
        if has_children {
            return Err(AppError::Conflict {
                resource: "order".to_string(),
                message: "Order still has fragments split from it".to_string(),
                message_ko: "분할된 하위 건이 있어 삭제할 수 없습니다".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(())
    }

    /// Queue an order for weaving (received -> weaving_queued)
    pub async fn queue_weaving(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        flip_status(
            &self.db,
            order_id,
            OrderStatus::Received,
            OrderStatus::WeavingQueued,
        )
        .await
    }

    /// Take an order back out of the weaving queue
    pub async fn cancel_queue(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        flip_status(
            &self.db,
            order_id,
            OrderStatus::WeavingQueued,
            OrderStatus::Received,
        )
        .await
    }
}
