//! # Route Handlers
//!
//! This module organizes the Axum route handlers for the `sqlsolver-server`.

pub mod general;
pub mod solve;

// Re-export the handlers so the router can reach them under a single `handlers::` path.
pub use general::*;
pub use solve::*;
