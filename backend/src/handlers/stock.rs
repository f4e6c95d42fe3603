//! Sellable stock HTTP handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::stock::{
    InjectStockInput, StockAdjustment, StockEdit, StockService, StockSummary,
};
use crate::AppState;
use shared::models::order::OrderRecord;

#[derive(Debug, Deserialize)]
pub struct AdjustmentsInput {
    pub edits: Vec<StockEdit>,
}

/// Roll up sellable stock by product
pub async fn stock_summary(State(state): State<AppState>) -> AppResult<Json<Vec<StockSummary>>> {
    let service = StockService::new(state.db);
    let summaries = service.summary().await?;
    Ok(Json(summaries))
}

/// List every sellable stock record
pub async fn stock_detail(State(state): State<AppState>) -> AppResult<Json<Vec<OrderRecord>>> {
    let service = StockService::new(state.db);
    let records = service.list_detail().await?;
    Ok(Json(records))
}

/// Preview a reconciliation batch
pub async fn preview_adjustments(
    State(state): State<AppState>,
    Json(input): Json<AdjustmentsInput>,
) -> AppResult<Json<Vec<StockAdjustment>>> {
    let service = StockService::new(state.db);
    let adjustments = service.preview_adjustments(&input.edits).await?;
    Ok(Json(adjustments))
}

/// Apply a reconciliation batch
pub async fn apply_adjustments(
    State(state): State<AppState>,
    Json(input): Json<AdjustmentsInput>,
) -> AppResult<Json<Vec<OrderRecord>>> {
    let service = StockService::new(state.db);
    let updated = service.apply_adjustments(&input.edits).await?;
    Ok(Json(updated))
}

/// Inject an opening-balance stock record
pub async fn inject_stock(
    State(state): State<AppState>,
    Json(input): Json<InjectStockInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = StockService::new(state.db);
    let record = service.inject_stock(input).await?;
    Ok(Json(record))
}
