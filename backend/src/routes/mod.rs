//! Route definitions for the LPG Safety Inspection Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::identity_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Distributor registration and approval
        .nest("/distributors", distributor_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - delivery staff
        .nest("/agents", agent_routes())
        // Protected routes - stock allocation
        .nest("/allocations", allocation_routes())
        // Protected routes - field inspections
        .nest("/inspections", inspection_routes())
        // Protected routes - admin reports
        .nest("/reports", report_routes())
}

/// Distributor routes (registration is public, the rest is protected)
fn distributor_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(handlers::list_distributors))
        .route("/:distributor_id", get(handlers::get_distributor))
        .route("/:distributor_id/approve", post(handlers::approve_distributor))
        .route("/:distributor_id/reject", post(handlers::reject_distributor))
        .route("/exchange-rate", put(handlers::update_exchange_rate))
        .route_layer(middleware::from_fn(identity_middleware));

    Router::new()
        .route("/register", post(handlers::register_distributor))
        .merge(protected)
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::deactivate_product),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Delivery agent routes (protected)
fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_agents).post(handlers::create_agent))
        .route(
            "/:agent_id",
            get(handlers::get_agent)
                .put(handlers::update_agent)
                .delete(handlers::deactivate_agent),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Stock allocation routes (protected)
fn allocation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::assign_allocation))
        .route("/availability", get(handlers::get_availability))
        .route("/products/:product_id", get(handlers::list_product_allocations))
        .route("/agents/:agent_id", get(handlers::list_agent_allocations))
        .route(
            "/products/:product_id/agents/:agent_id",
            delete(handlers::revoke_allocation),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Inspection routes (protected)
fn inspection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inspections).post(handlers::submit_inspection),
        )
        .route("/:inspection_id", get(handlers::get_inspection))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Admin report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(handlers::get_daily_sales))
        .route("/agents", get(handlers::get_agent_performance))
        .route("/products", get(handlers::get_product_sales))
        .route("/dashboard", get(handlers::get_dashboard_metrics))
        .route_layer(middleware::from_fn(identity_middleware))
}
