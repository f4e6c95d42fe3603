//! Sewing stage HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::sewing::{
    CompleteSewingInput, SewingCancel, SewingService, SewingStart, StartSewingInput,
};
use crate::AppState;
use shared::models::order::OrderRecord;

/// Start sewing on all or part of a dyed fragment
pub async fn start_sewing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<StartSewingInput>,
) -> AppResult<Json<SewingStart>> {
    let service = SewingService::new(state.db);
    let start = service.start_sewing(order_id, input).await?;
    Ok(Json(start))
}

/// Complete a sewing run
pub async fn complete_sewing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<CompleteSewingInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = SewingService::new(state.db);
    let order = service.complete_sewing(order_id, input).await?;
    Ok(Json(order))
}

/// Cancel a sewing run, merging back into a dyed sibling when possible
pub async fn cancel_sewing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<SewingCancel>> {
    let service = SewingService::new(state.db);
    let cancel = service.cancel_sewing(order_id).await?;
    Ok(Json(cancel))
}
