//! # Sidesa Server Library
//!
//! Wiring of configuration, storage, services and the HTTP router, plus
//! logging and shutdown handling for the `sidesa-server` binary.

pub mod app;
pub mod startup;

pub use app::{Application, DatabaseReadiness};
