//! Custom Axum extractors.

mod form_json;

pub use form_json::*;
