//! Distributor account service
//!
//! New agencies register themselves and wait in `pending` until a
//! super-admin approves or rejects the account. Admins of an approved
//! distributor can tune the hotplate exchange rate used by inspection
//! pricing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    validate_indian_phone, validate_name, Distributor, DistributorStatus,
    RegisterDistributorInput,
};

/// Distributor service for registration and approval
#[derive(Clone)]
pub struct DistributorService {
    db: PgPool,
}

/// Database row for a distributor
#[derive(Debug, sqlx::FromRow)]
struct DistributorRow {
    id: Uuid,
    name: String,
    owner_name: String,
    phone: String,
    address: Option<String>,
    status: String,
    hotplate_exchange_rate: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DistributorRow> for Distributor {
    type Error = AppError;

    fn try_from(row: DistributorRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "pending" => DistributorStatus::Pending,
            "approved" => DistributorStatus::Approved,
            "rejected" => DistributorStatus::Rejected,
            other => {
                return Err(AppError::Internal(format!(
                    "unknown distributor status '{}'",
                    other
                )))
            }
        };

        Ok(Distributor {
            id: row.id,
            name: row.name,
            owner_name: row.owner_name,
            phone: row.phone,
            address: row.address,
            status,
            hotplate_exchange_rate: row.hotplate_exchange_rate,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Input for updating the hotplate exchange rate
#[derive(Debug, Deserialize)]
pub struct UpdateExchangeRateInput {
    pub hotplate_exchange_rate: Decimal,
}

impl DistributorService {
    /// Create a new DistributorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new distributor; the account starts pending approval
    pub async fn register(&self, input: RegisterDistributorInput) -> AppResult<Distributor> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_name(&input.owner_name).map_err(|msg| AppError::Validation {
            field: "owner_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_indian_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            INSERT INTO distributors (name, owner_name, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, owner_name, phone, address, status, hotplate_exchange_rate,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.owner_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Get a distributor by id
    pub async fn get(&self, distributor_id: Uuid) -> AppResult<Distributor> {
        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            SELECT id, name, owner_name, phone, address, status, hotplate_exchange_rate,
                   created_at, updated_at
            FROM distributors
            WHERE id = $1
            "#,
        )
        .bind(distributor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Distributor".to_string()))?;

        row.try_into()
    }

    /// List distributors, optionally by status (super-admin view)
    pub async fn list(&self, status: Option<DistributorStatus>) -> AppResult<Vec<Distributor>> {
        let rows = sqlx::query_as::<_, DistributorRow>(
            r#"
            SELECT id, name, owner_name, phone, address, status, hotplate_exchange_rate,
                   created_at, updated_at
            FROM distributors
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Approve a pending distributor account
    pub async fn approve(&self, distributor_id: Uuid) -> AppResult<Distributor> {
        self.transition(distributor_id, DistributorStatus::Approved)
            .await
    }

    /// Reject a pending distributor account
    pub async fn reject(&self, distributor_id: Uuid) -> AppResult<Distributor> {
        self.transition(distributor_id, DistributorStatus::Rejected)
            .await
    }

    /// Update the per-distributor hotplate exchange rate
    pub async fn update_exchange_rate(
        &self,
        distributor_id: Uuid,
        input: UpdateExchangeRateInput,
    ) -> AppResult<Distributor> {
        if input.hotplate_exchange_rate < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "hotplate_exchange_rate".to_string(),
                message: "Exchange rate cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            UPDATE distributors
            SET hotplate_exchange_rate = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_name, phone, address, status, hotplate_exchange_rate,
                      created_at, updated_at
            "#,
        )
        .bind(distributor_id)
        .bind(input.hotplate_exchange_rate)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Distributor".to_string()))?;

        row.try_into()
    }

    /// Move a pending account to a terminal review state
    async fn transition(
        &self,
        distributor_id: Uuid,
        to: DistributorStatus,
    ) -> AppResult<Distributor> {
        let mut tx = self.db.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM distributors WHERE id = $1 FOR UPDATE")
                .bind(distributor_id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or_else(|| AppError::NotFound("Distributor".to_string()))?;
        if current != DistributorStatus::Pending.as_str() {
            return Err(AppError::InvalidStateTransition(format!(
                "Distributor is already {}",
                current
            )));
        }

        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            UPDATE distributors
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_name, phone, address, status, hotplate_exchange_rate,
                      created_at, updated_at
            "#,
        )
        .bind(distributor_id)
        .bind(to.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(distributor_id = %distributor_id, status = %to, "distributor account reviewed");

        row.try_into()
    }
}
