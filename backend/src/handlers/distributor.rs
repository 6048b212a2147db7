//! HTTP handlers for distributor registration and approval

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::distributor::{DistributorService, UpdateExchangeRateInput};
use crate::AppState;
use shared::{Distributor, DistributorStatus, RegisterDistributorInput};

/// Query options for the distributor listing
#[derive(Debug, Deserialize)]
pub struct DistributorListQuery {
    pub status: Option<DistributorStatus>,
}

/// Register a new distributor account (public; lands pending approval)
pub async fn register_distributor(
    State(state): State<AppState>,
    Json(input): Json<RegisterDistributorInput>,
) -> AppResult<(StatusCode, Json<Distributor>)> {
    let service = DistributorService::new(state.db);
    let distributor = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(distributor)))
}

/// List distributor accounts (super-admin)
pub async fn list_distributors(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DistributorListQuery>,
) -> AppResult<Json<Vec<Distributor>>> {
    if !current_user.0.is_super_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = DistributorService::new(state.db);
    let distributors = service.list(query.status).await?;
    Ok(Json(distributors))
}

/// Get one distributor account
///
/// Admins may read their own agency; super-admins may read any.
pub async fn get_distributor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(distributor_id): Path<Uuid>,
) -> AppResult<Json<Distributor>> {
    if !current_user.0.is_super_admin() && current_user.0.distributor_id != Some(distributor_id) {
        return Err(AppError::InsufficientPermissions);
    }
    let service = DistributorService::new(state.db);
    let distributor = service.get(distributor_id).await?;
    Ok(Json(distributor))
}

/// Approve a pending distributor account (super-admin)
pub async fn approve_distributor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(distributor_id): Path<Uuid>,
) -> AppResult<Json<Distributor>> {
    if !current_user.0.is_super_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = DistributorService::new(state.db);
    let distributor = service.approve(distributor_id).await?;
    Ok(Json(distributor))
}

/// Reject a pending distributor account (super-admin)
pub async fn reject_distributor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(distributor_id): Path<Uuid>,
) -> AppResult<Json<Distributor>> {
    if !current_user.0.is_super_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = DistributorService::new(state.db);
    let distributor = service.reject(distributor_id).await?;
    Ok(Json(distributor))
}

/// Update the hotplate exchange rate used by inspection pricing (admin)
pub async fn update_exchange_rate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateExchangeRateInput>,
) -> AppResult<Json<Distributor>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = DistributorService::new(state.db);
    let distributor = service
        .update_exchange_rate(current_user.0.require_distributor()?, input)
        .await?;
    Ok(Json(distributor))
}
