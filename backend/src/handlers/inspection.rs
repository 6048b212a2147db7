//! HTTP handlers for inspection endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::inspection::{
    InspectionFilter, InspectionResponse, InspectionService, InspectionSummary,
};
use crate::AppState;
use shared::{Inspection, PaginatedResponse, SubmitInspectionInput, UserRole};

/// Submit a finalized field visit
///
/// Agents may only submit their own inspections; admins may backfill for
/// any of their agents.
pub async fn submit_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SubmitInspectionInput>,
) -> AppResult<(StatusCode, Json<InspectionResponse>)> {
    if current_user.0.role == UserRole::Agent && current_user.0.user_id != input.agent_id {
        return Err(AppError::InsufficientPermissions);
    }
    let service = InspectionService::new(state.db);
    let response = service
        .submit(current_user.0.require_distributor()?, input)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List inspections; agents see only their own visits
pub async fn list_inspections(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(mut filter): Query<InspectionFilter>,
) -> AppResult<Json<PaginatedResponse<InspectionSummary>>> {
    if current_user.0.role == UserRole::Agent {
        filter.agent_id = Some(current_user.0.user_id);
    }
    let service = InspectionService::new(state.db);
    let summaries = service
        .list(current_user.0.require_distributor()?, filter)
        .await?;
    Ok(Json(summaries))
}

/// Get a finalized inspection with its line items
pub async fn get_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    let service = InspectionService::new(state.db);
    let inspection = service
        .get(current_user.0.require_distributor()?, inspection_id)
        .await?;

    if current_user.0.role == UserRole::Agent && current_user.0.user_id != inspection.agent_id {
        return Err(AppError::InsufficientPermissions);
    }

    Ok(Json(inspection))
}
