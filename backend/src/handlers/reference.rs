//! Master data HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reference::ReferenceService;
use crate::AppState;
use shared::models::common_code::CommonCode;
use shared::models::machine::Machine;
use shared::models::partner::{Partner, PartnerType};
use shared::models::product::Product;

#[derive(Debug, Deserialize)]
pub struct ListPartnersQuery {
    #[serde(rename = "type")]
    pub partner_type: Option<PartnerType>,
}

/// List the product catalogue
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ReferenceService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Product>> {
    let service = ReferenceService::new(state.db);
    let product = service.get_product(&code).await?;
    Ok(Json(product))
}

/// List partners, optionally filtered by type
pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> AppResult<Json<Vec<Partner>>> {
    let service = ReferenceService::new(state.db);
    let partners = service.list_partners(query.partner_type).await?;
    Ok(Json(partners))
}

/// List the weaving machines
pub async fn list_machines(State(state): State<AppState>) -> AppResult<Json<Vec<Machine>>> {
    let service = ReferenceService::new(state.db);
    let machines = service.list_machines().await?;
    Ok(Json(machines))
}

/// List one common code group
pub async fn list_common_codes(
    State(state): State<AppState>,
    Path(group_code): Path<String>,
) -> AppResult<Json<Vec<CommonCode>>> {
    let service = ReferenceService::new(state.db);
    let codes = service.list_common_codes(&group_code).await?;
    Ok(Json(codes))
}
