//! Result type aliases for Sidesa.

use crate::SidesaError;

/// A specialized `Result` type for Sidesa operations.
pub type SidesaResult<T> = Result<T, SidesaError>;
