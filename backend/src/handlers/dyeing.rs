//! Dyeing stage HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::dyeing::{CompleteDyeingInput, DyeingService, SendToDyeingInput};
use crate::AppState;
use shared::models::order::OrderRecord;

/// Send a fragment out to the dye house
pub async fn send_to_dyeing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<SendToDyeingInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = DyeingService::new(state.db);
    let order = service.send_to_dyeing(order_id, input).await?;
    Ok(Json(order))
}

/// Receive a fragment back from the dye house
pub async fn complete_dyeing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<CompleteDyeingInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = DyeingService::new(state.db);
    let order = service.complete_dyeing(order_id, input).await?;
    Ok(Json(order))
}

/// Cancel the dyeing send-out
pub async fn cancel_dyeing(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = DyeingService::new(state.db);
    let order = service.cancel_dyeing(order_id).await?;
    Ok(Json(order))
}

/// Cancel the dyeing completion
pub async fn cancel_dyed(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = DyeingService::new(state.db);
    let order = service.cancel_dyed(order_id).await?;
    Ok(Json(order))
}
