//! Dyeing stage service
//!
//! The dyeing stage never fragments: send-out and receive-back are status
//! flips carrying the dye-house metadata and the cost settlement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{lock_order, store_record, transition_failure, OrderRow, ORDER_COLUMNS};
use shared::models::money;
use shared::models::order::{DyeingData, OrderRecord};
use shared::models::status::OrderStatus;

/// Dyeing service for out/in transitions and cost settlement
#[derive(Clone)]
pub struct DyeingService {
    db: PgPool,
}

/// Input for sending a fragment out to the dye house
#[derive(Debug, Deserialize)]
pub struct SendToDyeingInput {
    pub partner: String,
    pub out_date: NaiveDate,
    pub out_weight_kg: Option<Decimal>,
    pub color_code: Option<String>,
    pub color_name: Option<String>,
}

/// Input for receiving a fragment back from the dye house
#[derive(Debug, Deserialize)]
pub struct CompleteDyeingInput {
    pub in_date: NaiveDate,
    pub in_weight_kg: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    /// Whether the entered unit price already includes VAT
    pub vat_included: bool,
}

impl DyeingService {
    /// Create a new DyeingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Send out for dyeing (weaving_done -> dyeing)
    pub async fn send_to_dyeing(
        &self,
        order_id: Uuid,
        input: SendToDyeingInput,
    ) -> AppResult<OrderRecord> {
        if input.partner.trim().is_empty() {
            return Err(AppError::Validation {
                field: "partner".to_string(),
                message: "Dyeing partner is required".to_string(),
                message_ko: "염색 업체를 선택해주세요".to_string(),
            });
        }
        let partner_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM partners WHERE name = $1 AND partner_type = 'dyeing')",
        )
        .bind(&input.partner)
        .fetch_one(&self.db)
        .await?;
        if !partner_exists {
            return Err(AppError::NotFound("Dyeing partner".to_string()));
        }

        let dyeing = DyeingData {
            partner: input.partner,
            out_date: input.out_date,
            out_weight_kg: input.out_weight_kg,
            in_date: None,
            in_weight_kg: None,
            unit_price: None,
            amount: None,
            vat_included: None,
            color_code: input.color_code,
            color_name: input.color_name,
        };
        let dyeing_json =
            serde_json::to_value(&dyeing).map_err(|e| AppError::Internal(e.to_string()))?;

        let sql = format!(
            r#"
            UPDATE orders SET status = 'dyeing', dyeing = $2
            WHERE id = $1 AND status = 'weaving_done'
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .bind(&dyeing_json)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => row.into_record(),
            None => Err(transition_failure(&self.db, order_id, OrderStatus::WeavingDone).await?),
        }
    }

    /// Receive back from the dye house (dyeing -> dyed), settling the
    /// cost. The amount is unit price times received weight, with VAT
    /// backed out of or added onto the entered price.
    pub async fn complete_dyeing(
        &self,
        order_id: Uuid,
        input: CompleteDyeingInput,
    ) -> AppResult<OrderRecord> {
        let mut tx = self.db.begin().await?;

        let mut record = lock_order(&mut tx, order_id).await?;
        if record.status != OrderStatus::Dyeing {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be dyeing to complete dyeing, currently {}",
                record.status.as_str()
            )));
        }
        let mut dyeing = record
            .dyeing
            .take()
            .ok_or_else(|| AppError::Internal("dyeing record has no dyeing payload".to_string()))?;

        let amount = match (input.unit_price, input.in_weight_kg) {
            (Some(price), Some(weight)) => {
                let gross = price * weight;
                let breakdown = if input.vat_included {
                    money::vat_from_inclusive(gross)
                } else {
                    money::vat_from_exclusive(gross)
                };
                Some(breakdown.total)
            }
            _ => None,
        };

        dyeing.in_date = Some(input.in_date);
        dyeing.in_weight_kg = input.in_weight_kg;
        dyeing.unit_price = input.unit_price;
        dyeing.amount = amount;
        dyeing.vat_included = Some(input.vat_included);

        record.dyeing = Some(dyeing);
        record.status = OrderStatus::Dyed;
        let record = store_record(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Cancel dyeing out (dyeing -> weaving_done), dropping the payload
    pub async fn cancel_dyeing(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        let sql = format!(
            r#"
            UPDATE orders SET status = 'weaving_done', dyeing = NULL
            WHERE id = $1 AND status = 'dyeing'
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => row.into_record(),
            None => Err(transition_failure(&self.db, order_id, OrderStatus::Dyeing).await?),
        }
    }

    /// Cancel dyeing completion (dyed -> dyeing), keeping the out-fields
    pub async fn cancel_dyed(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        let mut tx = self.db.begin().await?;

        let mut record = lock_order(&mut tx, order_id).await?;
        if record.status != OrderStatus::Dyed {
            return Err(AppError::InvalidStateTransition(format!(
                "order must be dyed to cancel dyeing completion, currently {}",
                record.status.as_str()
            )));
        }

        if let Some(dyeing) = record.dyeing.as_mut() {
            dyeing.in_date = None;
            dyeing.in_weight_kg = None;
            dyeing.unit_price = None;
            dyeing.amount = None;
            dyeing.vat_included = None;
        }
        record.status = OrderStatus::Dyeing;
        let record = store_record(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(record)
    }
}
