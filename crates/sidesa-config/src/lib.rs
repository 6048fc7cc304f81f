//! # Sidesa Config
//!
//! Configuration management for the Sidesa user service.
//! Supports layered configuration from files and environment variables,
//! validated in full before the server starts.

mod app_config;
mod loader;
pub mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::{format_validation_errors, ConfigValidationError, ConfigValidator};
