//! Product catalog service
//!
//! Admins maintain the distributor's sellable catalog here. Total stock can
//! never be reduced below what is already allocated to delivery agents, and
//! products referenced by allocations are deactivated rather than deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    validate_name, validate_price_pair, validate_stock_quantity, CreateProductInput, Product,
    UpdateProductInput,
};

/// Product service for managing the distributor catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
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

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
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

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product in the distributor's catalog
    pub async fn create(
        &self,
        distributor_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock_quantity(input.total_stock).map_err(|msg| AppError::Validation {
            field: "total_stock".to_string(),
            message: msg.to_string(),
        })?;
        validate_price_pair(input.min_price, input.selling_price).map_err(|msg| {
            AppError::Validation {
                field: "min_price".to_string(),
                message: msg.to_string(),
            }
        })?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (distributor_id, name, total_stock, selling_price, min_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, distributor_id, name, total_stock, selling_price, min_price,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(distributor_id)
        .bind(&input.name)
        .bind(input.total_stock)
        .bind(input.selling_price)
        .bind(input.min_price)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a product; stock cannot drop below the allocated sum
    pub async fn update(
        &self,
        distributor_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ProductRow>(
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
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let total_stock = input.total_stock.unwrap_or(existing.total_stock);
        let selling_price = input.selling_price.unwrap_or(existing.selling_price);
        let min_price = input.min_price.unwrap_or(existing.min_price);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock_quantity(total_stock).map_err(|msg| AppError::Validation {
            field: "total_stock".to_string(),
            message: msg.to_string(),
        })?;
        validate_price_pair(min_price, selling_price).map_err(|msg| AppError::Validation {
            field: "min_price".to_string(),
            message: msg.to_string(),
        })?;

        // Shrinking stock below the allocated sum would break conservation
        let allocated: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM allocations WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if (total_stock as i64) < allocated {
            return Err(AppError::Conflict(format!(
                "Total stock ({}) cannot drop below the {} units already allocated",
                total_stock, allocated
            )));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, total_stock = $2, selling_price = $3, min_price = $4,
                is_active = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, distributor_id, name, total_stock, selling_price, min_price,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(total_stock)
        .bind(selling_price)
        .bind(min_price)
        .bind(is_active)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get a product by id
    pub async fn get(&self, distributor_id: Uuid, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, distributor_id, name, total_stock, selling_price, min_price,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = $1 AND distributor_id = $2
            "#,
        )
        .bind(product_id)
        .bind(distributor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List the distributor's products
    pub async fn list(
        &self,
        distributor_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, distributor_id, name, total_stock, selling_price, min_price,
                   is_active, created_at, updated_at
            FROM products
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

    /// Deactivate a product (allocations may still reference it)
    pub async fn deactivate(&self, distributor_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND distributor_id = $2",
        )
        .bind(product_id)
        .bind(distributor_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}
