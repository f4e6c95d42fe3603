//! Order management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::orders::{CreateOrderInput, OrderService};
use crate::AppState;
use shared::models::order::OrderRecord;
use shared::models::status::OrderStatus;
use shared::types::{PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteInput {
    pub note: Option<String>,
}

/// Create a new order
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.create_order(input).await?;
    Ok(Json(order))
}

/// List orders, optionally filtered by status
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<PaginatedResponse<OrderRecord>>> {
    let default = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default.page),
        per_page: query.per_page.unwrap_or(default.per_page),
    };

    let service = OrderService::new(state.db);
    let orders = service.list_orders(query.status, pagination).await?;
    Ok(Json(orders))
}

/// Get a single order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Update the note on an order
pub async fn update_note(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateNoteInput>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.update_note(order_id, input.note).await?;
    Ok(Json(order))
}

/// Delete an order
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = OrderService::new(state.db);
    service.delete_order(order_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Queue an order for weaving
pub async fn queue_weaving(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.queue_weaving(order_id).await?;
    Ok(Json(order))
}

/// Take an order back out of the weaving queue
pub async fn cancel_queue(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.cancel_queue(order_id).await?;
    Ok(Json(order))
}
