//! # Sidesa Security
//!
//! Password hashing for user credentials.

pub mod password;

pub use password::*;
