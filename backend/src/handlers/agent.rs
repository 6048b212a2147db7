//! HTTP handlers for delivery agent endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::AgentService;
use crate::AppState;
use shared::{CreateAgentInput, DeliveryAgent, UpdateAgentInput};

/// Query options for agent listings
#[derive(Debug, Deserialize)]
pub struct AgentListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Register a delivery agent (admin)
pub async fn create_agent(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAgentInput>,
) -> AppResult<Json<DeliveryAgent>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AgentService::new(state.db);
    let agent = service
        .create(current_user.0.require_distributor()?, input)
        .await?;
    Ok(Json(agent))
}

/// List the distributor's delivery agents
pub async fn list_agents(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AgentListQuery>,
) -> AppResult<Json<Vec<DeliveryAgent>>> {
    let service = AgentService::new(state.db);
    let agents = service
        .list(
            current_user.0.require_distributor()?,
            query.include_inactive,
        )
        .await?;
    Ok(Json(agents))
}

/// Get a delivery agent by id
pub async fn get_agent(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(agent_id): Path<Uuid>,
) -> AppResult<Json<DeliveryAgent>> {
    let service = AgentService::new(state.db);
    let agent = service
        .get(current_user.0.require_distributor()?, agent_id)
        .await?;
    Ok(Json(agent))
}

/// Update a delivery agent (admin)
pub async fn update_agent(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(agent_id): Path<Uuid>,
    Json(input): Json<UpdateAgentInput>,
) -> AppResult<Json<DeliveryAgent>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AgentService::new(state.db);
    let agent = service
        .update(current_user.0.require_distributor()?, agent_id, input)
        .await?;
    Ok(Json(agent))
}

/// Deactivate a delivery agent (admin)
pub async fn deactivate_agent(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(agent_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AgentService::new(state.db);
    service
        .deactivate(current_user.0.require_distributor()?, agent_id)
        .await?;
    Ok(Json(()))
}
