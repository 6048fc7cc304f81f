//! # Sidesa Service
//!
//! User registration, login, listings and soft-delete lifecycle.
//! Services own the transaction boundary of every call.

pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod messages;
pub mod user_service;

pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use user_service::*;
