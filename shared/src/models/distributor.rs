//! Distributor (agency) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approval state of a distributor account
///
/// New registrations land in `Pending` until a super-admin reviews them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistributorStatus {
    Pending,
    Approved,
    Rejected,
}

impl DistributorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributorStatus::Pending => "pending",
            DistributorStatus::Approved => "approved",
            DistributorStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for DistributorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered LPG distributor (agency)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributor {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub phone: String,
    pub address: Option<String>,
    pub status: DistributorStatus,
    /// Fixed amount subtracted when a visit includes a hotplate exchange
    pub hotplate_exchange_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a new distributor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDistributorInput {
    pub name: String,
    pub owner_name: String,
    pub phone: String,
    pub address: Option<String>,
}
