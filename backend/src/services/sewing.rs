//! Sewing stage service
//!
//! Starting sewing may split a dyed fragment (work on part of the batch
//! now, leave the rest dyed); canceling a sewing run re-merges the
//! quantity into a matching dyed sibling when one still exists.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{
    insert_fragment, lock_order, store_record, NewFragment, OrderRow, ORDER_COLUMNS,
};
use shared::models::money;
use shared::models::order::{
    base_order_no, is_merge_sibling, OrderRecord, SewingData, SewingType,
};
use shared::models::quantity::{net_good_units, split_stock, QuantityError};
use shared::models::status::OrderStatus;

/// Sewing service for start/complete/cancel with splits and merges
#[derive(Clone)]
pub struct SewingService {
    db: PgPool,
}

/// Input for starting a sewing run
#[derive(Debug, Deserialize)]
pub struct StartSewingInput {
    /// Work quantity; less than the fragment's stock splits off a child
    pub qty: i32,
    pub sewing_type: SewingType,
    pub partner: Option<String>,
    pub start_date: NaiveDate,
    pub unit_price: Option<Decimal>,
}

/// Input for completing a sewing run
#[derive(Debug, Deserialize)]
pub struct CompleteSewingInput {
    /// Completed count, before defects are removed
    pub real_stock: i32,
    pub defect_qty: i32,
    pub end_date: NaiveDate,
    /// Whether the external unit price already includes VAT
    pub vat_included: bool,
}

/// Result of starting a sewing run: the fragment now sewing and, for a
/// partial start, the remainder still dyed
#[derive(Debug, Serialize)]
pub struct SewingStart {
    pub record: OrderRecord,
    pub remainder: Option<OrderRecord>,
}

/// Result of canceling a sewing run
#[derive(Debug, Serialize)]
pub struct SewingCancel {
    /// The surviving record: the reverted fragment, or the sibling the
    /// quantity was merged into
    pub record: OrderRecord,
    pub merged: bool,
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

impl SewingService {
    /// Create a new SewingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Start sewing on all or part of a dyed fragment
    /// (dyed -> sewing, with a split when partial)
    pub async fn start_sewing(
        &self,
        order_id: Uuid,
        input: StartSewingInput,
    ) -> AppResult<SewingStart> {
        if input.sewing_type == SewingType::External {
            let partner = input.partner.as_deref().unwrap_or("").trim().to_string();
            if partner.is_empty() {
                return Err(AppError::Validation {
                    field: "partner".to_string(),
                    message: "Sewing partner is required for external sewing".to_string(),
                    message_ko: "외주 봉제 업체를 선택해주세요".to_string(),
                });
            }
            let partner_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM partners WHERE name = $1 AND partner_type = 'sewing')",
            )
            .bind(&partner)
            .fetch_one(&self.db)
            .await?;
            if !partner_exists {
                return Err(AppError::NotFound("Sewing partner".to_string()));
            }
        }

        let mut tx = self.db.begin().await?;

        let mut original = lock_order(&mut tx, order_id).await?;
        if original.status != OrderStatus::Dyed {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be dyed to start sewing, currently {}",
                original.status.as_str()
            )));
        }

        let split = split_stock(original.stock, input.qty).map_err(quantity_error)?;

        let sewing = SewingData {
            partner: input.partner.clone(),
            sewing_type: input.sewing_type,
            start_date: input.start_date,
            end_date: None,
            real_stock: None,
            defect_qty: None,
            unit_price: input.unit_price,
            amount: None,
        };

        let result = if split.is_full() {
            // Whole batch advances in place
            original.status = OrderStatus::Sewing;
            original.sewing = Some(sewing);
            let record = store_record(&mut tx, &original).await?;
            SewingStart {
                record,
                remainder: None,
            }
        } else {
            // Child carries the working quantity forward; the original
            // keeps the remainder at dyed
            let mut child = NewFragment::cloned_from(&original);
            child.parent_id = Some(original.id);
            child.status = OrderStatus::Sewing;
            child.stock = split.taken;
            child.sewing = Some(sewing);
            let record = insert_fragment(&mut tx, &child).await?;

            original.stock = split.remainder;
            let remainder = store_record(&mut tx, &original).await?;
            SewingStart {
                record,
                remainder: Some(remainder),
            }
        };

        tx.commit().await?;

        Ok(result)
    }

    /// Complete a sewing run (sewing -> sewn).
    ///
    /// The fragment's stock becomes the net good count. External runs are
    /// billed on gross production (defects included); the defect count is
    /// kept separately for reporting.
    pub async fn complete_sewing(
        &self,
        order_id: Uuid,
        input: CompleteSewingInput,
    ) -> AppResult<OrderRecord> {
        if input.real_stock < 0 || input.defect_qty < 0 {
            return Err(AppError::Validation {
                field: "real_stock".to_string(),
                message: "Counts cannot be negative".to_string(),
                message_ko: "수량은 음수일 수 없습니다".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let mut record = lock_order(&mut tx, order_id).await?;
        if record.status != OrderStatus::Sewing {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be sewing to complete sewing, currently {}",
                record.status.as_str()
            )));
        }
        let mut sewing = record
            .sewing
            .take()
            .ok_or_else(|| AppError::Internal("sewing record has no sewing payload".to_string()))?;

        let final_stock = net_good_units(input.real_stock, input.defect_qty);

        sewing.end_date = Some(input.end_date);
        sewing.real_stock = Some(input.real_stock);
        sewing.defect_qty = Some(input.defect_qty);
        if sewing.sewing_type == SewingType::External {
            if let Some(price) = sewing.unit_price {
                let breakdown = money::line_amount(price, input.real_stock, input.vat_included);
                sewing.amount = Some(breakdown.total);
            }
        }

        record.sewing = Some(sewing);
        record.stock = final_stock;
        record.status = OrderStatus::Sewn;
        let record = store_record(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Cancel a sewing run (sewing -> dyed, with merge).
    ///
    /// If a dyed sibling of the same base order, product and color still
    /// exists, the canceled quantity is added back into it and this
    /// record is deleted. Without a sibling the record simply reverts in
    /// place; a missing sibling is never an error.
    pub async fn cancel_sewing(&self, order_id: Uuid) -> AppResult<SewingCancel> {
        let mut tx = self.db.begin().await?;

        let mut record = lock_order(&mut tx, order_id).await?;
        if record.status != OrderStatus::Sewing {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be sewing to cancel sewing, currently {}",
                record.status.as_str()
            )));
        }

        let base = base_order_no(&record.order_no).to_string();
        let color_code = record
            .dyeing
            .as_ref()
            .and_then(|d| d.color_code.clone());

        // Candidates share the base order number; product and color are
        // matched through the same predicate the tests pin down.
        let sql = format!(
            r#"
            SELECT {} FROM orders
            WHERE id <> $1 AND status = 'dyed'
              AND split_part(order_no, '-', 1) = $2
            ORDER BY created_at
            FOR UPDATE
            "#,
            ORDER_COLUMNS
        );
        let candidates = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(record.id)
            .bind(&base)
            .fetch_all(&mut *tx)
            .await?;

        let mut sibling = None;
        for row in candidates {
            let candidate = row.into_record()?;
            let matches = is_merge_sibling(
                &record.order_no,
                &record.product_code,
                color_code.as_deref(),
                &candidate.order_no,
                &candidate.product_code,
                candidate
                    .dyeing
                    .as_ref()
                    .and_then(|d| d.color_code.as_deref()),
            );
            if matches {
                sibling = Some(candidate);
                break;
            }
        }

        let result = match sibling {
            Some(mut sibling) => {
                sibling.stock += record.stock;
                let sibling = store_record(&mut tx, &sibling).await?;

                sqlx::query("DELETE FROM orders WHERE id = $1")
                    .bind(record.id)
                    .execute(&mut *tx)
                    .await?;

                SewingCancel {
                    record: sibling,
                    merged: true,
                }
            }
            None => {
                record.status = OrderStatus::Dyed;
                record.sewing = None;
                let record = store_record(&mut tx, &record).await?;
                SewingCancel {
                    record,
                    merged: false,
                }
            }
        };

        tx.commit().await?;

        Ok(result)
    }
}
