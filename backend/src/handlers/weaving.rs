//! Weaving stage HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::weaving::{
    CompleteRollInput, RollCompletion, StartWeavingInput, WeavingService,
};
use crate::AppState;
use shared::models::order::OrderRecord;

/// Start weaving on a machine
pub async fn start_weaving(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<StartWeavingInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = WeavingService::new(state.db);
    let order = service.start_weaving(order_id, input).await?;
    Ok(Json(order))
}

/// Complete one roll
pub async fn complete_roll(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<CompleteRollInput>,
) -> AppResult<Json<RollCompletion>> {
    let service = WeavingService::new(state.db);
    let completion = service.complete_roll(order_id, input).await?;
    Ok(Json(completion))
}

/// Cancel a completed roll
pub async fn cancel_roll(
    State(state): State<AppState>,
    Path(roll_id): Path<Uuid>,
) -> AppResult<Json<Option<OrderRecord>>> {
    let service = WeavingService::new(state.db);
    let parent = service.cancel_roll(roll_id).await?;
    Ok(Json(parent))
}

/// Cancel weaving in progress
pub async fn cancel_weaving(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = WeavingService::new(state.db);
    let order = service.cancel_weaving(order_id).await?;
    Ok(Json(order))
}
