//! HTTP handlers for stock allocation endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::allocation::{
    AllocationService, AllocationView, AssignAllocationInput, AvailabilityResponse,
};
use crate::AppState;
use shared::{AllocationRecord, UserRole};

/// Query parameters for the availability check
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub product_id: Uuid,
    pub agent_id: Uuid,
}

/// Quantity an agent may currently be assigned (admin assignment screen)
pub async fn get_availability(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AllocationService::new(state.db);
    let availability = service
        .availability(
            current_user.0.require_distributor()?,
            query.product_id,
            query.agent_id,
        )
        .await?;
    Ok(Json(availability))
}

/// Assign stock to an agent, replacing any prior allocation (admin)
pub async fn assign_allocation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AssignAllocationInput>,
) -> AppResult<Json<AllocationRecord>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AllocationService::new(state.db);
    let record = service
        .assign(current_user.0.require_distributor()?, input)
        .await?;
    Ok(Json(record))
}

/// Release an agent's allocation back into the pool (admin)
pub async fn revoke_allocation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, agent_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<()>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AllocationService::new(state.db);
    service
        .revoke(current_user.0.require_distributor()?, product_id, agent_id)
        .await?;
    Ok(Json(()))
}

/// All allocations of one product across agents (admin)
pub async fn list_product_allocations(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<AllocationView>>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AllocationService::new(state.db);
    let views = service
        .list_for_product(current_user.0.require_distributor()?, product_id)
        .await?;
    Ok(Json(views))
}

/// The stock one agent currently carries
///
/// Agents may only view their own load; admins may view any agent's.
pub async fn list_agent_allocations(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(agent_id): Path<Uuid>,
) -> AppResult<Json<Vec<AllocationView>>> {
    if current_user.0.role == UserRole::Agent && current_user.0.user_id != agent_id {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AllocationService::new(state.db);
    let views = service
        .list_for_agent(current_user.0.require_distributor()?, agent_id)
        .await?;
    Ok(Json(views))
}
