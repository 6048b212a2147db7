//! Delivery agent models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A delivery person who carries allocated stock and performs inspections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAgent {
    pub id: Uuid,
    pub distributor_id: Uuid,
    pub name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a delivery agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentInput {
    pub name: String,
    pub phone: String,
}

/// Input for updating a delivery agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAgentInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
