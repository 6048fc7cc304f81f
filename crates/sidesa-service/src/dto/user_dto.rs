//! User read models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sidesa_core::UserId;
use utoipa::ToSchema;

/// One row of a user listing, formatted for display.
///
/// Dates are Indonesian strings; a value that is absent or cannot be
/// formatted is rendered as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    /// 1-based position in the listing.
    pub index: usize,
    pub id: UserId,
    pub nama: String,
    pub email: String,
    pub no_hp: String,
    /// e.g. `01 Januari 1990`.
    pub tanggal_lahir: String,
    pub role: String,
    pub profile_file: String,
    /// e.g. `01 Januari 2024 13:45`.
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: String,
}

/// A single user looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDetail {
    pub id: UserId,
    pub nama: String,
    pub email: String,
    pub no_hp: String,
    /// e.g. `01 Januari 1990`; empty when the stored value is unparseable.
    pub tanggal_lahir: String,
    pub role: String,
    pub profile_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
