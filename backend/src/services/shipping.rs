//! Shipping stage service
//!
//! Shipment is batch-oriented: several sewn fragments go out together,
//! each possibly split (ship part, keep the rest sellable). The whole
//! batch commits atomically. Freight is either charged per line or as a
//! lump on the last line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{
    insert_fragment, lock_order, store_record, NewFragment, OrderRow, ORDER_COLUMNS,
};
use shared::models::money::allocate_freight;
use shared::models::order::{FreightMode, OrderRecord, ShippingData};
use shared::models::quantity::{split_stock, QuantityError};
use shared::models::status::OrderStatus;
use shared::types::DateRange;

/// Shipping service for batch shipment and cancellation
#[derive(Clone)]
pub struct ShippingService {
    db: PgPool,
}

/// One line of a shipment batch
#[derive(Debug, Deserialize)]
pub struct ShipItem {
    pub order_id: Uuid,
    pub qty: i32,
}

/// Input for shipping a batch
#[derive(Debug, Deserialize)]
pub struct ShipInput {
    pub items: Vec<ShipItem>,
    pub date: NaiveDate,
    pub method: Option<String>,
    pub carrier: Option<String>,
    pub unit_price: Option<Decimal>,
    pub freight_cost: Option<Decimal>,
    pub freight_mode: Option<FreightMode>,
    pub delivery_to: Option<String>,
    pub delivery_contact: Option<String>,
    pub delivery_address: Option<String>,
}

/// Result of shipping a batch
#[derive(Debug, Serialize)]
pub struct ShipmentResult {
    /// The records now at shipped, one per line
    pub shipped: Vec<OrderRecord>,
}

/// Result of a batch cancellation
#[derive(Debug, Serialize)]
pub struct ShipmentCancelResult {
    /// How many records were actually reverted; ids that did not resolve
    /// (freight pseudo-lines, already-canceled rows) are skipped
    pub reverted: u64,
}

fn quantity_error(err: QuantityError) -> AppError {
    match err {
        QuantityError::NonPositive => AppError::Validation {
            field: "qty".to_string(),
            message: "Quantity must be positive".to_string(),
            message_ko: "수량은 1 이상이어야 합니다".to_string(),
        },
        QuantityError::ExceedsStock {
            requested,
            available,
        } => AppError::InsufficientStock(format!(
            "requested {} but only {} available",
            requested, available
        )),
    }
}

impl ShippingService {
    /// Create a new ShippingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Ship a batch of sewn fragments (sewn -> shipped, splitting where
    /// partial), all in one transaction.
    pub async fn ship(&self, input: ShipInput) -> AppResult<ShipmentResult> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one shipment line is required".to_string(),
                message_ko: "출고할 항목을 선택해주세요".to_string(),
            });
        }

        let freight_lines = match input.freight_cost {
            Some(cost) => allocate_freight(
                input.freight_mode.unwrap_or(FreightMode::PerItem),
                cost,
                input.items.len(),
            ),
            None => vec![Decimal::ZERO; input.items.len()],
        };

        let mut tx = self.db.begin().await?;
        let mut shipped = Vec::with_capacity(input.items.len());

        for (item, freight) in input.items.iter().zip(freight_lines) {
            let mut original = lock_order(&mut tx, item.order_id).await?;
            if original.status != OrderStatus::Sewn {
                return Err(AppError::InvalidStateTransition(format!(
                    "order {} must be sewn to ship, currently {}",
                    original.order_no,
                    original.status.as_str()
                )));
            }

            let split = split_stock(original.stock, item.qty).map_err(quantity_error)?;

            let shipping = ShippingData {
                date: input.date,
                method: input.method.clone(),
                carrier: input.carrier.clone(),
                freight_cost: (freight != Decimal::ZERO).then_some(freight),
                freight_mode: input.freight_cost.and(input.freight_mode),
                delivery_to: input.delivery_to.clone(),
                delivery_contact: input.delivery_contact.clone(),
                delivery_address: input.delivery_address.clone(),
            };

            let record = if split.is_full() {
                original.status = OrderStatus::Shipped;
                original.shipping = Some(shipping);
                if input.unit_price.is_some() {
                    original.unit_price = input.unit_price;
                }
                store_record(&mut tx, &original).await?
            } else {
                let mut child = NewFragment::cloned_from(&original);
                child.parent_id = Some(original.id);
                child.status = OrderStatus::Shipped;
                child.stock = split.taken;
                child.shipping = Some(shipping);
                if input.unit_price.is_some() {
                    child.unit_price = input.unit_price;
                }
                let record = insert_fragment(&mut tx, &child).await?;

                original.stock = split.remainder;
                store_record(&mut tx, &original).await?;
                record
            };

            shipped.push(record);
        }

        tx.commit().await?;

        Ok(ShipmentResult { shipped })
    }

    /// List shipped records whose shipment date falls in the range,
    /// newest shipment first.
    pub async fn list_shipments(&self, range: DateRange) -> AppResult<Vec<OrderRecord>> {
        if range.end < range.start {
            return Err(AppError::Validation {
                field: "end".to_string(),
                message: "End date must not precede start date".to_string(),
                message_ko: "종료일은 시작일보다 빠를 수 없습니다".to_string(),
            });
        }

        let sql = format!(
            r#"
            SELECT {} FROM orders
            WHERE status = 'shipped'
              AND (shipping->>'date')::DATE BETWEEN $1 AND $2
            ORDER BY (shipping->>'date')::DATE DESC, created_at DESC
            "#,
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(OrderRow::into_record).collect()
    }

    /// Cancel shipped records in bulk (shipped -> sewn), one atomic
    /// batch. Ids that do not resolve to a shipped record are skipped
    /// rather than failing the batch.
    pub async fn cancel_shipments(&self, ids: &[Uuid]) -> AppResult<ShipmentCancelResult> {
        if ids.is_empty() {
            return Err(AppError::Validation {
                field: "ids".to_string(),
                message: "At least one shipment id is required".to_string(),
                message_ko: "취소할 출고 건을 선택해주세요".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'sewn', shipping = NULL
            WHERE id = ANY($1) AND status = 'shipped'
            "#,
        )
        .bind(ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ShipmentCancelResult {
            reverted: result.rows_affected(),
        })
    }
}
