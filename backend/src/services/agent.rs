//! Delivery agent service
//!
//! Admin-side management of the delivery staff who carry allocated stock.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_indian_phone, validate_name, CreateAgentInput, DeliveryAgent, UpdateAgentInput};

/// Agent service for managing delivery staff
#[derive(Clone)]
pub struct AgentService {
    db: PgPool,
}

/// Database row for a delivery agent
#[derive(Debug, sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    distributor_id: Uuid,
    name: String,
    phone: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AgentRow> for DeliveryAgent {
    fn from(row: AgentRow) -> Self {
        DeliveryAgent {
            id: row.id,
            distributor_id: row.distributor_id,
            name: row.name,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl AgentService {
    /// Create a new AgentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a delivery agent for the distributor
    pub async fn create(
        &self,
        distributor_id: Uuid,
        input: CreateAgentInput,
    ) -> AppResult<DeliveryAgent> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_indian_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let row = sqlx::query_as::<_, AgentRow>(
            r#"
            INSERT INTO delivery_agents (distributor_id, name, phone)
            VALUES ($1, $2, $3)
            RETURNING id, distributor_id, name, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(distributor_id)
        .bind(&input.name)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a delivery agent
    pub async fn update(
        &self,
        distributor_id: Uuid,
        agent_id: Uuid,
        input: UpdateAgentInput,
    ) -> AppResult<DeliveryAgent> {
        let existing = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT id, distributor_id, name, phone, is_active, created_at, updated_at
            FROM delivery_agents
            WHERE id = $1 AND distributor_id = $2
            "#,
        )
        .bind(agent_id)
        .bind(distributor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery agent".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.unwrap_or(existing.phone);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_indian_phone(&phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let row = sqlx::query_as::<_, AgentRow>(
            r#"
            UPDATE delivery_agents
            SET name = $1, phone = $2, is_active = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, distributor_id, name, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(is_active)
        .bind(agent_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a delivery agent by id
    pub async fn get(&self, distributor_id: Uuid, agent_id: Uuid) -> AppResult<DeliveryAgent> {
        let row = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT id, distributor_id, name, phone, is_active, created_at, updated_at
            FROM delivery_agents
            WHERE id = $1 AND distributor_id = $2
            "#,
        )
        .bind(agent_id)
        .bind(distributor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery agent".to_string()))?;

        Ok(row.into())
    }

    /// List the distributor's delivery agents
    pub async fn list(
        &self,
        distributor_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<DeliveryAgent>> {
        let rows = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT id, distributor_id, name, phone, is_active, created_at, updated_at
            FROM delivery_agents
            WHERE distributor_id = $1 AND (is_active OR $2)
            ORDER BY name
            "#,
        )
        .bind(distributor_id)
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Deactivate a delivery agent; their allocations stay visible to admins
    pub async fn deactivate(&self, distributor_id: Uuid, agent_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE delivery_agents SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND distributor_id = $2",
        )
        .bind(agent_id)
        .bind(distributor_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Delivery agent".to_string()));
        }

        Ok(())
    }
}
