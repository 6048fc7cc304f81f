//! # Sidesa Core
//!
//! Core types, errors, and the user entity shared by every layer of the
//! Sidesa backend.

pub mod context;
pub mod date_format;
pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod validation;

pub use context::*;
pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;
