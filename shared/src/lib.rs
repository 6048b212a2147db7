//! Shared types and models for the LPG Safety Inspection Platform
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system, including the pure stock-allocation
//! and inspection-pricing computations.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
