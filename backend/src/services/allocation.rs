//! Stock allocation service
//!
//! Wraps the pure allocation computation in `shared` with the persistence
//! contract it requires: every mutating call re-reads the allocation
//! snapshot under a per-product row lock, so two admins assigning the same
//! product concurrently serialize instead of racing a stale snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    available_for_agent, propose_allocation, total_allocated, Allocation, AllocationRecord,
    Product,
};

/// Allocation service for assigning stock to delivery agents
#[derive(Clone)]
pub struct AllocationService {
    db: PgPool,
}

/// Database row for an allocation
#[derive(Debug, sqlx::FromRow)]
struct AllocationRow {
    id: Uuid,
    product_id: Uuid,
    agent_id: Uuid,
    quantity: i32,
    price: Decimal,
    min_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AllocationRow {
    fn allocation(&self) -> Allocation {
        Allocation {
            product_id: self.product_id,
            agent_id: self.agent_id,
            quantity: self.quantity,
            price: self.price,
            min_price: self.min_price,
        }
    }
}

impl From<AllocationRow> for AllocationRecord {
    fn from(row: AllocationRow) -> Self {
        AllocationRecord {
            id: row.id,
            allocation: row.allocation(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for assigning (or re-assigning) stock to an agent
#[derive(Debug, Deserialize)]
pub struct AssignAllocationInput {
    pub product_id: Uuid,
    pub agent_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub min_price: Decimal,
}

/// Headroom figure shown on the assignment screen
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub product_id: Uuid,
    pub agent_id: Uuid,
    pub total_stock: i32,
    pub total_allocated: i32,
    /// Maximum quantity the agent may hold, own claim netted out
    pub available: i32,
}

/// One agent's allocation with display names joined in
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AllocationView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub agent_id: Uuid,
    pub agent_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub min_price: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl AllocationService {
    /// Create a new AllocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the quantity an agent may currently be assigned
    ///
    /// Read-only snapshot for the assignment screen; the figure is
    /// re-validated under lock when the assignment is actually submitted. A
    /// negative headroom (stored over-allocation) is reported as zero.
    pub async fn availability(
        &self,
        distributor_id: Uuid,
        product_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<AvailabilityResponse> {
        let product = self.fetch_product(&self.db, distributor_id, product_id).await?;

        let allocations: Vec<Allocation> = sqlx::query_as::<_, AllocationRow>(
            r#"
            SELECT id, product_id, agent_id, quantity, price, min_price, created_at, updated_at
            FROM allocations
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?
        .iter()
        .map(AllocationRow::allocation)
        .collect();

        let available = available_for_agent(&product, &allocations, agent_id).max(0);

        Ok(AvailabilityResponse {
            product_id,
            agent_id,
            total_stock: product.total_stock,
            total_allocated: total_allocated(product_id, &allocations),
            available,
        })
    }

    /// Assign stock to an agent, replacing any prior allocation
    ///
    /// Takes the product row lock first, re-reads the allocation snapshot
    /// inside the transaction, and only then validates the proposal, so the
    /// conservation invariant holds under concurrent admins.
    pub async fn assign(
        &self,
        distributor_id: Uuid,
        input: AssignAllocationInput,
    ) -> AppResult<AllocationRecord> {
        let mut tx = self.db.begin().await?;

        let product = self
            .lock_product(&mut tx, distributor_id, input.product_id)
            .await?;

        if !product.is_active {
            return Err(AppError::Conflict(
                "Cannot allocate an inactive product".to_string(),
            ));
        }

        let agent_active: Option<bool> = sqlx::query_scalar(
            "SELECT is_active FROM delivery_agents WHERE id = $1 AND distributor_id = $2",
        )
        .bind(input.agent_id)
        .bind(distributor_id)
        .fetch_optional(&mut *tx)
        .await?;

        match agent_active {
            None => return Err(AppError::NotFound("Delivery agent".to_string())),
            Some(false) => {
                return Err(AppError::Conflict(
                    "Cannot allocate stock to an inactive agent".to_string(),
                ))
            }
            Some(true) => {}
        }

        let allocations: Vec<Allocation> = sqlx::query_as::<_, AllocationRow>(
            r#"
            SELECT id, product_id, agent_id, quantity, price, min_price, created_at, updated_at
            FROM allocations
            WHERE product_id = $1
            "#,
        )
        .bind(input.product_id)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(AllocationRow::allocation)
        .collect();

        let proposal = propose_allocation(
            &product,
            &allocations,
            input.agent_id,
            input.quantity,
            input.price,
            input.min_price,
        )?;

        let row = sqlx::query_as::<_, AllocationRow>(
            r#"
            INSERT INTO allocations (product_id, agent_id, quantity, price, min_price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id, agent_id)
            DO UPDATE SET quantity = EXCLUDED.quantity,
                          price = EXCLUDED.price,
                          min_price = EXCLUDED.min_price,
                          updated_at = NOW()
            RETURNING id, product_id, agent_id, quantity, price, min_price, created_at, updated_at
            "#,
        )
        .bind(proposal.product_id)
        .bind(proposal.agent_id)
        .bind(proposal.quantity)
        .bind(proposal.price)
        .bind(proposal.min_price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            product_id = %input.product_id,
            agent_id = %input.agent_id,
            quantity = input.quantity,
            "stock allocation committed"
        );

        Ok(row.into())
    }

    /// Release an agent's allocation back into the pool
    pub async fn revoke(
        &self,
        distributor_id: Uuid,
        product_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM allocations a
            USING products p
            WHERE a.product_id = p.id
              AND a.product_id = $1 AND a.agent_id = $2 AND p.distributor_id = $3
            "#,
        )
        .bind(product_id)
        .bind(agent_id)
        .bind(distributor_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Allocation".to_string()));
        }

        Ok(())
    }

    /// All allocations of one product across agents (admin view)
    pub async fn list_for_product(
        &self,
        distributor_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<AllocationView>> {
        // Verify ownership before listing
        self.fetch_product(&self.db, distributor_id, product_id).await?;

        let views = sqlx::query_as::<_, AllocationView>(
            r#"
            SELECT a.id, a.product_id, p.name AS product_name,
                   a.agent_id, d.name AS agent_name,
                   a.quantity, a.price, a.min_price, a.updated_at
            FROM allocations a
            JOIN products p ON p.id = a.product_id
            JOIN delivery_agents d ON d.id = a.agent_id
            WHERE a.product_id = $1
            ORDER BY d.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(views)
    }

    /// The stock one agent currently carries (delivery-facing view)
    pub async fn list_for_agent(
        &self,
        distributor_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<Vec<AllocationView>> {
        let agent_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM delivery_agents WHERE id = $1 AND distributor_id = $2)",
        )
        .bind(agent_id)
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        if !agent_exists {
            return Err(AppError::NotFound("Delivery agent".to_string()));
        }

        let views = sqlx::query_as::<_, AllocationView>(
            r#"
            SELECT a.id, a.product_id, p.name AS product_name,
                   a.agent_id, d.name AS agent_name,
                   a.quantity, a.price, a.min_price, a.updated_at
            FROM allocations a
            JOIN products p ON p.id = a.product_id
            JOIN delivery_agents d ON d.id = a.agent_id
            WHERE a.agent_id = $1 AND a.quantity > 0
            ORDER BY p.name
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.db)
        .await?;

        Ok(views)
    }

    /// Fetch a product without locking
    async fn fetch_product(
        &self,
        db: &PgPool,
        distributor_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Product> {
        let product = sqlx::query_as::<_, ProductStockRow>(
            r#"
            SELECT id, distributor_id, name, total_stock, selling_price, min_price,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = $1 AND distributor_id = $2
            "#,
        )
        .bind(product_id)
        .bind(distributor_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }

    /// Fetch a product under `FOR UPDATE`, serializing writers per product
    async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        distributor_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Product> {
        let product = sqlx::query_as::<_, ProductStockRow>(
            r#"
            SELECT id, distributor_id, name, total_stock, selling_price, min_price,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = $1 AND distributor_id = $2
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .bind(distributor_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }
}

/// Product row reused by availability and assignment paths
#[derive(Debug, sqlx::FromRow)]
struct ProductStockRow {
    id: Uuid,
    distributor_id: Uuid,
    name: String,
    total_stock: i32,
    selling_price: Decimal,
    min_price: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductStockRow> for Product {
    fn from(row: ProductStockRow) -> Self {
        Product {
            id: row.id,
            distributor_id: row.distributor_id,
            name: row.name,
            total_stock: row.total_stock,
            selling_price: row.selling_price,
            min_price: row.min_price,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
