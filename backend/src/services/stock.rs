//! Sellable stock service
//!
//! Everything sitting at sewn is sellable stock. This service reports on
//! it, reconciles it against physical counts, and injects opening-balance
//! records for stock that predates the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{insert_fragment, NewFragment, OrderRow, ORDER_COLUMNS};
use shared::models::order::{OrderRecord, STOCK_PREFIX};
use shared::models::status::OrderStatus;
use shared::validation::validate_positive_qty;

/// Stock service for summaries, reconciliation and injection
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Per-product rollup of sellable stock
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StockSummary {
    pub product_code: String,
    pub product_type: String,
    pub total_stock: i64,
    pub avg_unit_price: Option<Decimal>,
    pub total_value: Decimal,
}

/// One reconciliation edit: fields left `None` keep their stored value
#[derive(Debug, Clone, Deserialize)]
pub struct StockEdit {
    pub order_id: Uuid,
    pub stock: Option<i32>,
    pub unit_price: Option<Decimal>,
}

/// Preview of what one edit would change
#[derive(Debug, Serialize)]
pub struct StockAdjustment {
    pub order_id: Uuid,
    pub order_no: String,
    pub product_code: String,
    pub stock_before: i32,
    pub stock_after: i32,
    pub unit_price_before: Option<Decimal>,
    pub unit_price_after: Option<Decimal>,
}

impl StockAdjustment {
    fn is_noop(&self) -> bool {
        self.stock_before == self.stock_after && self.unit_price_before == self.unit_price_after
    }
}

/// Input for injecting an opening-balance stock record
#[derive(Debug, Deserialize)]
pub struct InjectStockInput {
    pub product_code: String,
    /// Holder of the stock; blank for house stock
    pub customer: Option<String>,
    pub qty: i32,
    pub unit_price: Option<Decimal>,
    pub note: Option<String>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Roll up sellable stock by product
    pub async fn summary(&self) -> AppResult<Vec<StockSummary>> {
        let summaries = sqlx::query_as::<_, StockSummary>(
            r#"
            SELECT product_code, product_type,
                   SUM(stock)::BIGINT AS total_stock,
                   AVG(unit_price) AS avg_unit_price,
                   COALESCE(SUM(stock * COALESCE(unit_price, 0)), 0) AS total_value
            FROM orders
            WHERE status = 'sewn'
            GROUP BY product_code, product_type
            ORDER BY product_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(summaries)
    }

    /// List every record currently counted as sellable stock
    pub async fn list_detail(&self) -> AppResult<Vec<OrderRecord>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE status = 'sewn' ORDER BY product_code, created_at",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(OrderRow::into_record).collect()
    }

    fn validate_edits(edits: &[StockEdit]) -> AppResult<()> {
        if edits.is_empty() {
            return Err(AppError::Validation {
                field: "edits".to_string(),
                message: "At least one edit is required".to_string(),
                message_ko: "수정할 항목이 없습니다".to_string(),
            });
        }
        for edit in edits {
            if let Some(stock) = edit.stock {
                if stock < 0 {
                    return Err(AppError::Validation {
                        field: "stock".to_string(),
                        message: "Stock cannot be negative".to_string(),
                        message_ko: "재고 수량은 음수일 수 없습니다".to_string(),
                    });
                }
            }
            if let Some(price) = edit.unit_price {
                if price < Decimal::ZERO {
                    return Err(AppError::Validation {
                        field: "unit_price".to_string(),
                        message: "Unit price cannot be negative".to_string(),
                        message_ko: "단가는 음수일 수 없습니다".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Preview a reconciliation batch without writing anything. Edits that
    /// change nothing are dropped from the preview.
    pub async fn preview_adjustments(
        &self,
        edits: &[StockEdit],
    ) -> AppResult<Vec<StockAdjustment>> {
        Self::validate_edits(edits)?;

        let mut adjustments = Vec::with_capacity(edits.len());
        for edit in edits {
            let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
            let record = sqlx::query_as::<_, OrderRow>(&sql)
                .bind(edit.order_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::StaleRecord("Stock record".to_string()))?
                .into_record()?;
            if record.status != OrderStatus::Sewn {
                return Err(AppError::StaleRecord("Stock record".to_string()));
            }

            let adjustment = StockAdjustment {
                order_id: record.id,
                order_no: record.order_no,
                product_code: record.product_code,
                stock_before: record.stock,
                stock_after: edit.stock.unwrap_or(record.stock),
                unit_price_before: record.unit_price,
                unit_price_after: edit.unit_price.or(record.unit_price),
            };
            if !adjustment.is_noop() {
                adjustments.push(adjustment);
            }
        }

        Ok(adjustments)
    }

    /// Apply a reconciliation batch in one transaction. Any record that is
    /// no longer at sewn aborts the whole batch; a partially applied
    /// count would be worse than none.
    pub async fn apply_adjustments(&self, edits: &[StockEdit]) -> AppResult<Vec<OrderRecord>> {
        Self::validate_edits(edits)?;

        let mut tx = self.db.begin().await?;
        let mut updated = Vec::with_capacity(edits.len());

        for edit in edits {
            let sql = format!(
                r#"
                UPDATE orders
                SET stock = COALESCE($2, stock), unit_price = COALESCE($3, unit_price)
                WHERE id = $1 AND status = 'sewn'
                RETURNING {}
                "#,
                ORDER_COLUMNS
            );
            let row = sqlx::query_as::<_, OrderRow>(&sql)
                .bind(edit.order_id)
                .bind(edit.stock)
                .bind(edit.unit_price)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::StaleRecord("Stock record".to_string()))?;
            updated.push(row.into_record()?);
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Inject an opening-balance record straight at sewn. These carry a
    /// reserved `STOCK-` number and no lineage.
    pub async fn inject_stock(&self, input: InjectStockInput) -> AppResult<OrderRecord> {
        if let Err(msg) = validate_positive_qty(input.qty) {
            return Err(AppError::Validation {
                field: "qty".to_string(),
                message: msg.to_string(),
                message_ko: "수량은 1 이상이어야 합니다".to_string(),
            });
        }
        let product = sqlx::query_as::<_, (String, Option<String>, Option<Decimal>, Option<String>)>(
            "SELECT product_type, yarn_type, weight_g, size FROM products WHERE code = $1",
        )
        .bind(&input.product_code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut tx = self.db.begin().await?;

        let sequence: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO order_counters (counter_key, last_seq)
            VALUES ('STOCK', 1)
            ON CONFLICT (counter_key) DO UPDATE SET last_seq = order_counters.last_seq + 1
            RETURNING last_seq
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let fragment = NewFragment {
            order_no: format!("{}{:04}", STOCK_PREFIX, sequence),
            parent_id: None,
            status: OrderStatus::Sewn,
            product_code: input.product_code.clone(),
            product_type: product.0,
            yarn_type: product.1,
            weight_g: product.2,
            size: product.3,
            customer: input.customer.clone().unwrap_or_default(),
            stock: input.qty,
            unit_price: input.unit_price,
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
}
