//! Shipping stage HTTP handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::shipping::{
    ShipInput, ShipmentCancelResult, ShipmentResult, ShippingService,
};
use crate::AppState;
use shared::models::order::OrderRecord;
use shared::types::DateRange;

#[derive(Debug, Deserialize)]
pub struct CancelShipmentsInput {
    pub ids: Vec<Uuid>,
}

/// Ship a batch of sewn fragments
pub async fn ship(
    State(state): State<AppState>,
    Json(input): Json<ShipInput>,
) -> AppResult<Json<ShipmentResult>> {
    let service = ShippingService::new(state.db);
    let result = service.ship(input).await?;
    Ok(Json(result))
}

/// List shipped records in a date range
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<OrderRecord>>> {
    let service = ShippingService::new(state.db);
    let shipments = service.list_shipments(range).await?;
    Ok(Json(shipments))
}

/// Cancel shipped records in bulk
pub async fn cancel_shipments(
    State(state): State<AppState>,
    Json(input): Json<CancelShipmentsInput>,
) -> AppResult<Json<ShipmentCancelResult>> {
    let service = ShippingService::new(state.db);
    let result = service.cancel_shipments(&input.ids).await?;
    Ok(Json(result))
}
