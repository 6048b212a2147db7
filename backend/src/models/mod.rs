//! Database models for the LPG Safety Inspection Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
