//! HTTP handlers for admin reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::report::{
    AgentPerformanceReport, DailySalesReport, DashboardMetrics, ProductSalesReport, ReportFilter,
    ReportService,
};
use crate::AppState;

/// Daily sales totals (admin)
pub async fn get_daily_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<DailySalesReport>>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ReportService::new(state.db);
    let report = service
        .get_daily_sales(current_user.0.require_distributor()?, &filter)
        .await?;
    Ok(Json(report))
}

/// Per-agent performance totals (admin)
pub async fn get_agent_performance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<AgentPerformanceReport>>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ReportService::new(state.db);
    let report = service
        .get_agent_performance(current_user.0.require_distributor()?, &filter)
        .await?;
    Ok(Json(report))
}

/// Per-product sales totals (admin)
pub async fn get_product_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<ProductSalesReport>>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ReportService::new(state.db);
    let report = service
        .get_product_sales(current_user.0.require_distributor()?, &filter)
        .await?;
    Ok(Json(report))
}

/// Dashboard metrics (admin)
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = ReportService::new(state.db);
    let metrics = service
        .get_dashboard_metrics(current_user.0.require_distributor()?)
        .await?;
    Ok(Json(metrics))
}
