//! Shared types and models for the Fabric Ops platform
//!
//! This crate contains the order record model, the production status
//! machine, pure quantity/VAT calculations, and reference-data types
//! shared between the backend and any other component of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
