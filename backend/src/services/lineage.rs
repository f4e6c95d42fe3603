//! Lineage service
//!
//! Every split leaves a parent pointer behind; this service walks them.
//! Upward gives the audit trail back to the original order, downward
//! gives the fragments split off a record, and the production view
//! compares what a weaving order promised against what its rolls
//! delivered.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::orders::{fetch_order, OrderRow, ORDER_COLUMNS};
use shared::models::order::OrderRecord;
use shared::models::quantity::remaining_to_produce;

/// Ancestry chains are short in practice (a handful of stages); a chain
/// this long means the parent pointers are corrupt.
const MAX_CHAIN_DEPTH: usize = 64;

/// Lineage service for ancestry walks and production progress
#[derive(Clone)]
pub struct LineageService {
    db: PgPool,
}

/// Production progress of a weaving order against its completed rolls
#[derive(Debug, Serialize)]
pub struct ProductionProgress {
    pub order: OrderRecord,
    /// Sum of produced quantities across completed rolls
    pub produced: i32,
    /// Ordered total minus produced; negative when production overshot
    pub remaining: i32,
    pub next_roll_no: i32,
}

impl LineageService {
    /// Create a new LineageService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Walk parent pointers from a record up to its root order. The first
    /// element is the record itself, the last its root.
    pub async fn trace_to_root(&self, order_id: Uuid) -> AppResult<Vec<OrderRecord>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(order_id);

        while let Some(id) = current {
            if !visited.insert(id) || chain.len() >= MAX_CHAIN_DEPTH {
                return Err(AppError::Internal(format!(
                    "lineage cycle detected at order {}",
                    id
                )));
            }
            let record = fetch_order(&self.db, id).await?;
            current = record.parent_id;
            chain.push(record);
        }

        Ok(chain)
    }

    /// List the fragments split directly off a record, oldest first
    pub async fn children(&self, order_id: Uuid) -> AppResult<Vec<OrderRecord>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE parent_id = $1 ORDER BY created_at",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(OrderRow::into_record).collect()
    }

    /// Production progress for a weaving order: ordered total against the
    /// quantities its completed rolls actually produced.
    pub async fn production_progress(&self, order_id: Uuid) -> AppResult<ProductionProgress> {
        let order = fetch_order(&self.db, order_id).await?;

        let per_roll: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT COALESCE((weaving->>'real_stock')::INT, 0)
            FROM orders
            WHERE parent_id = $1 AND roll_no IS NOT NULL
            ORDER BY roll_no
            "#,
        )
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        let produced: i32 = per_roll.iter().sum();
        let remaining = remaining_to_produce(order.stock, &per_roll);
        let next_roll_no = order.completed_rolls.unwrap_or(0) + 1;

        Ok(ProductionProgress {
            order,
            produced,
            remaining,
            next_roll_no,
        })
    }
}
