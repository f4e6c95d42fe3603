//! Weaving stage service
//!
//! Start of weaving takes exclusive ownership of a machine; completing a
//! roll is the defining split operation: the parent keeps the ordered
//! total while each completed roll becomes a child fragment at
//! weaving-done, numbered `base-N`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{
    insert_fragment, lock_order, store_record, transition_failure, NewFragment, OrderRow,
    ORDER_COLUMNS,
};
use shared::models::order::{
    base_order_no, next_roll_no, roll_order_no, OrderRecord, WeavingData,
};
use shared::models::status::OrderStatus;
use shared::validation::validate_positive_qty;

/// Weaving service for machine assignment and roll completion
#[derive(Clone)]
pub struct WeavingService {
    db: PgPool,
}

/// Input for starting weaving on a machine
#[derive(Debug, Deserialize)]
pub struct StartWeavingInput {
    pub machine_no: i32,
    pub roll_count: i32,
    pub start_time: Option<DateTime<Utc>>,
}

/// Input for completing one roll
#[derive(Debug, Deserialize)]
pub struct CompleteRollInput {
    /// Produced quantity for this roll
    pub real_stock: i32,
    pub real_weight_kg: Option<Decimal>,
    pub prod_weight_kg: Option<Decimal>,
    pub avg_weight_kg: Option<Decimal>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Result of completing a roll: the new child fragment and the updated
/// parent
#[derive(Debug, Serialize)]
pub struct RollCompletion {
    pub child: OrderRecord,
    pub parent: OrderRecord,
}

impl WeavingService {
    /// Create a new WeavingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Assign a machine and start weaving (weaving_queued -> weaving).
    ///
    /// Machine exclusivity is enforced by the guarded update itself, not
    /// by a separate read: the row only flips if no other in-progress
    /// record holds the machine at commit time, so two concurrent starts
    /// on one machine cannot both succeed.
    pub async fn start_weaving(
        &self,
        order_id: Uuid,
        input: StartWeavingInput,
    ) -> AppResult<OrderRecord> {
        if let Err(msg) = validate_positive_qty(input.roll_count) {
            return Err(AppError::Validation {
                field: "roll_count".to_string(),
                message: msg.to_string(),
                message_ko: "롤 수는 1 이상이어야 합니다".to_string(),
            });
        }

        let machine_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM machines WHERE machine_no = $1)",
        )
        .bind(input.machine_no)
        .fetch_one(&self.db)
        .await?;
        if !machine_exists {
            return Err(AppError::NotFound("Machine".to_string()));
        }

        let weaving = WeavingData {
            start_time: Some(input.start_time.unwrap_or_else(Utc::now)),
            ..Default::default()
        };
        let weaving_json =
            serde_json::to_value(&weaving).map_err(|e| AppError::Internal(e.to_string()))?;

        let sql = format!(
            r#"
            UPDATE orders
            SET status = 'weaving', machine_no = $2, weaving_roll_count = $3,
                completed_rolls = 0, weaving = $4
            WHERE id = $1 AND status = 'weaving_queued'
              AND NOT EXISTS (
                  SELECT 1 FROM orders busy
                  WHERE busy.machine_no = $2 AND busy.status = 'weaving' AND busy.id <> $1
              )
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .bind(input.machine_no)
            .bind(input.roll_count)
            .bind(&weaving_json)
            .fetch_optional(&self.db)
            .await?;

        if let Some(row) = row {
            return row.into_record();
        }

        // Nothing matched: machine busy, stale id, or wrong status
        let machine_statuses: Vec<String> = sqlx::query_scalar(
            "SELECT status FROM orders WHERE machine_no = $1 AND id <> $2",
        )
        .bind(input.machine_no)
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;
        let machine_busy = machine_statuses
            .iter()
            .filter_map(|s| OrderStatus::from_str(s))
            .any(|s| s.occupies_machine());
        if machine_busy {
            return Err(AppError::Conflict {
                resource: "machine".to_string(),
                message: format!("Machine {} is already weaving another order", input.machine_no),
                message_ko: format!("{}호기는 이미 다른 발주를 제직 중입니다", input.machine_no),
            });
        }
        Err(transition_failure(&self.db, order_id, OrderStatus::WeavingQueued).await?)
    }

    /// Complete one roll (the defining split).
    ///
    /// The parent's `stock` stays the ordered total; the produced quantity
    /// lives on the child and on the child's weaving payload.
    pub async fn complete_roll(
        &self,
        parent_id: Uuid,
        input: CompleteRollInput,
    ) -> AppResult<RollCompletion> {
        if let Err(msg) = validate_positive_qty(input.real_stock) {
            return Err(AppError::Validation {
                field: "real_stock".to_string(),
                message: msg.to_string(),
                message_ko: "생산 수량은 1 이상이어야 합니다".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let mut parent = lock_order(&mut tx, parent_id).await?;
        if parent.status != OrderStatus::Weaving {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be weaving to complete a roll, currently {}",
                parent.status.as_str()
            )));
        }

        let roll_count = parent.weaving_roll_count.unwrap_or(0);
        let existing_rolls: Vec<i32> = sqlx::query_scalar(
            "SELECT roll_no FROM orders WHERE parent_id = $1 AND roll_no IS NOT NULL",
        )
        .bind(parent.id)
        .fetch_all(&mut *tx)
        .await?;
        let completed = existing_rolls.len() as i32;
        if completed >= roll_count {
            return Err(AppError::InvalidStateTransition(format!(
                "all {} rolls are already completed",
                roll_count
            )));
        }
        // One past the highest surviving roll: a canceled low roll leaves
        // a gap rather than letting its number be reissued under a live
        // sibling's order number.
        let roll_no = next_roll_no(&existing_rolls);

        let child_weaving = WeavingData {
            start_time: parent.weaving.as_ref().and_then(|w| w.start_time),
            end_time: Some(input.end_time.unwrap_or_else(Utc::now)),
            real_stock: Some(input.real_stock),
            real_weight_kg: input.real_weight_kg,
            prod_weight_kg: input.prod_weight_kg,
            avg_weight_kg: input.avg_weight_kg,
        };

        let mut child = NewFragment::cloned_from(&parent);
        child.order_no = roll_order_no(base_order_no(&parent.order_no), roll_no);
        child.parent_id = Some(parent.id);
        child.status = OrderStatus::WeavingDone;
        child.stock = input.real_stock;
        child.machine_no = None;
        child.roll_no = Some(roll_no);
        child.weaving = Some(child_weaving);
        let child = insert_fragment(&mut tx, &child).await?;

        parent.completed_rolls = Some(completed + 1);
        parent.status = OrderStatus::after_roll_completion(completed + 1, roll_count);
        if parent.status.is_master() {
            // The machine frees up once the last roll is off it
            parent.machine_no = None;
            if let Some(weaving) = parent.weaving.as_mut() {
                weaving.end_time = Some(input.end_time.unwrap_or_else(Utc::now));
            }
        }
        let parent = store_record(&mut tx, &parent).await?;

        tx.commit().await?;

        Ok(RollCompletion { child, parent })
    }

    /// Cancel a completed roll: delete the child and give the parent its
    /// roll back. A master parent reverts to weaving.
    pub async fn cancel_roll(&self, child_id: Uuid) -> AppResult<Option<OrderRecord>> {
        let mut tx = self.db.begin().await?;

        let child = lock_order(&mut tx, child_id).await?;
        if child.status != OrderStatus::WeavingDone || child.roll_no.is_none() {
            return Err(AppError::InvalidStateTransition(
                "only a completed roll that has not advanced can be canceled".to_string(),
            ));
        }

        let parent_id = child.parent_id;

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(child.id)
            .execute(&mut *tx)
            .await?;

        // Parent may have been deleted in an admin flow; the roll delete
        // still stands on its own then.
        let parent = match parent_id {
            Some(parent_id) => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
                    ORDER_COLUMNS
                );
                sqlx::query_as::<_, OrderRow>(&sql)
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => None,
        };

        let parent = match parent {
            Some(row) => {
                let mut parent = row.into_record()?;
                let remaining: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM orders WHERE parent_id = $1 AND roll_no IS NOT NULL",
                )
                .bind(parent.id)
                .fetch_one(&mut *tx)
                .await?;
                parent.completed_rolls = Some(remaining as i32);
                if parent.status.is_master() {
                    parent.status = OrderStatus::Weaving;
                }
                Some(store_record(&mut tx, &parent).await?)
            }
            None => None,
        };

        tx.commit().await?;

        Ok(parent)
    }

    /// Cancel weaving in progress (weaving -> weaving_queued), freeing the
    /// machine. Blocked once rolls have been completed; cancel those
    /// first.
    pub async fn cancel_weaving(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        let mut tx = self.db.begin().await?;

        let mut record = lock_order(&mut tx, order_id).await?;
        if record.status != OrderStatus::Weaving {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be weaving to cancel weaving, currently {}",
                record.status.as_str()
            )));
        }
        if record.completed_rolls.unwrap_or(0) > 0 {
            return Err(AppError::InvalidStateTransition(
                "rolls have already been completed for this order".to_string(),
            ));
        }

        record.status = OrderStatus::WeavingQueued;
        record.machine_no = None;
        record.weaving_roll_count = None;
        record.completed_rolls = None;
        record.weaving = None;
        let record = store_record(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(record)
    }
}
