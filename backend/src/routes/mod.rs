//! Route definitions for the Fabric Ops API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/orders", order_routes())
        .nest("/weaving", weaving_routes())
        .nest("/dyeing", dyeing_routes())
        .nest("/sewing", sewing_routes())
        .nest("/shipping", shipping_routes())
        .nest("/stock", stock_routes())
        .nest("/lineage", lineage_routes())
        .nest("/reference", reference_routes())
}

/// Order management routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route("/:order_id/note", put(handlers::update_note))
        .route("/:order_id/queue", post(handlers::queue_weaving))
        .route("/:order_id/queue/cancel", post(handlers::cancel_queue))
}

/// Weaving stage routes
fn weaving_routes() -> Router<AppState> {
    Router::new()
        .route("/:order_id/start", post(handlers::start_weaving))
        .route("/:order_id/rolls", post(handlers::complete_roll))
        .route("/rolls/:roll_id", delete(handlers::cancel_roll))
        .route("/:order_id/cancel", post(handlers::cancel_weaving))
}

/// Dyeing stage routes
fn dyeing_routes() -> Router<AppState> {
    Router::new()
        .route("/:order_id/send", post(handlers::send_to_dyeing))
        .route("/:order_id/complete", post(handlers::complete_dyeing))
        .route("/:order_id/cancel", post(handlers::cancel_dyeing))
        .route("/:order_id/complete/cancel", post(handlers::cancel_dyed))
}

/// Sewing stage routes
fn sewing_routes() -> Router<AppState> {
    Router::new()
        .route("/:order_id/start", post(handlers::start_sewing))
        .route("/:order_id/complete", post(handlers::complete_sewing))
        .route("/:order_id/cancel", post(handlers::cancel_sewing))
}

/// Shipping stage routes
fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_shipments).post(handlers::ship))
        .route("/cancel", post(handlers::cancel_shipments))
}

/// Sellable stock routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::stock_detail))
        .route("/summary", get(handlers::stock_summary))
        .route("/adjustments/preview", post(handlers::preview_adjustments))
        .route("/adjustments", post(handlers::apply_adjustments))
        .route("/inject", post(handlers::inject_stock))
}

/// Lineage routes
fn lineage_routes() -> Router<AppState> {
    Router::new()
        .route("/:order_id/trace", get(handlers::trace_to_root))
        .route("/:order_id/children", get(handlers::list_children))
        .route("/:order_id/progress", get(handlers::production_progress))
}

/// Master data routes
fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:code", get(handlers::get_product))
        .route("/partners", get(handlers::list_partners))
        .route("/machines", get(handlers::list_machines))
        .route("/codes/:group_code", get(handlers::list_common_codes))
}
