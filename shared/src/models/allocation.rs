//! Stock allocation across delivery agents
//!
//! A distributor's finite product stock is earmarked to delivery agents one
//! allocation per (product, agent) pair. Re-assigning a product to the same
//! agent replaces the previous allocation, so the agent's own prior claim is
//! netted out when computing headroom. All functions here are pure: they
//! operate on an explicit snapshot of the allocation records and leave
//! persistence and serialization of writes to the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Product;

/// The quantity of a product earmarked for one delivery agent
///
/// `price` and `min_price` are snapshots taken at assignment time; later
/// edits to the product's catalog price never change an existing allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub product_id: Uuid,
    pub agent_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub min_price: Decimal,
}

/// A persisted allocation row with bookkeeping fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub allocation: Allocation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validation failures for a proposed allocation
///
/// All of these are expected, user-correctable outcomes; the caller surfaces
/// them verbatim so the admin can retry with a valid assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("allocation quantity must be positive")]
    InvalidQuantity,

    #[error("price and minimum price must be positive")]
    InvalidPrice,

    #[error("minimum price cannot exceed the selling price")]
    PriceBelowMinimum,

    #[error("requested {requested} units but only {available} available")]
    InsufficientStock { requested: i32, available: i32 },
}

/// Sum of quantities allocated for a product across all agents
pub fn total_allocated(product_id: Uuid, allocations: &[Allocation]) -> i32 {
    allocations
        .iter()
        .filter(|a| a.product_id == product_id)
        .map(|a| a.quantity)
        .sum()
}

/// The agent's own current allocation quantity for a product (0 if none)
pub fn existing_for_agent(product_id: Uuid, allocations: &[Allocation], agent_id: Uuid) -> i32 {
    allocations
        .iter()
        .find(|a| a.product_id == product_id && a.agent_id == agent_id)
        .map(|a| a.quantity)
        .unwrap_or(0)
}

/// Maximum quantity this agent may hold for the product
///
/// The agent's own prior claim is netted out, so the agent may keep, shrink,
/// or grow up to the returned figure, while other agents competing for the
/// same pool see that claim as already used. The result is negative only
/// when the stored allocations already over-commit the stock; callers must
/// treat a negative figure as zero capacity.
pub fn available_for_agent(product: &Product, allocations: &[Allocation], agent_id: Uuid) -> i32 {
    let existing = existing_for_agent(product.id, allocations, agent_id);
    let allocated_by_others = total_allocated(product.id, allocations) - existing;
    product.total_stock - allocated_by_others
}

/// Validate a proposed assignment and construct the replacement record
///
/// Checks fail fast in a fixed order: quantity, price positivity, price
/// floor, then stock availability. On success the returned [`Allocation`]
/// replaces (never adds to) any prior allocation of this product for this
/// agent; committing it atomically against a fresh snapshot is the caller's
/// responsibility.
pub fn propose_allocation(
    product: &Product,
    allocations: &[Allocation],
    agent_id: Uuid,
    requested_quantity: i32,
    price: Decimal,
    min_price: Decimal,
) -> Result<Allocation, StockError> {
    if requested_quantity <= 0 {
        return Err(StockError::InvalidQuantity);
    }
    if price <= Decimal::ZERO || min_price <= Decimal::ZERO {
        return Err(StockError::InvalidPrice);
    }
    if min_price > price {
        return Err(StockError::PriceBelowMinimum);
    }

    let available = available_for_agent(product, allocations, agent_id);
    if requested_quantity > available {
        return Err(StockError::InsufficientStock {
            requested: requested_quantity,
            available,
        });
    }

    Ok(Allocation {
        product_id: product.id,
        agent_id,
        quantity: requested_quantity,
        price,
        min_price,
    })
}
