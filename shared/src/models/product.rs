//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in a distributor's catalog (cylinders, regulators, hoses, ...)
///
/// `total_stock` is the quantity owned by the distributor; allocations across
/// all delivery agents may never exceed it. `min_price` is the floor a field
/// agent must not discount under; invariant `min_price <= selling_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub distributor_id: Uuid,
    pub name: String,
    pub total_stock: i32,
    pub selling_price: Decimal,
    pub min_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub total_stock: i32,
    pub selling_price: Decimal,
    pub min_price: Decimal,
}

/// Input for updating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub total_stock: Option<i32>,
    pub selling_price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub is_active: Option<bool>,
}
