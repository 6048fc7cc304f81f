//! # Sidesa REST
//!
//! HTTP surface of the Sidesa backend built on Axum: registration, login,
//! user listings, soft delete, restore and health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
