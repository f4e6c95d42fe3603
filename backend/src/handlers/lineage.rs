//! Lineage HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::lineage::{LineageService, ProductionProgress};
use crate::AppState;
use shared::models::order::OrderRecord;

/// Trace a record's ancestry back to its root order
pub async fn trace_to_root(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderRecord>>> {
    let service = LineageService::new(state.db);
    let chain = service.trace_to_root(order_id).await?;
    Ok(Json(chain))
}

/// List the fragments split directly off a record
pub async fn list_children(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderRecord>>> {
    let service = LineageService::new(state.db);
    let children = service.children(order_id).await?;
    Ok(Json(children))
}

/// Production progress of a weaving order
pub async fn production_progress(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ProductionProgress>> {
    let service = LineageService::new(state.db);
    let progress = service.production_progress(order_id).await?;
    Ok(Json(progress))
}
