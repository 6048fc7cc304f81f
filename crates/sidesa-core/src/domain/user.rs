//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "user";

/// Avatar shown when a user has not uploaded a profile picture.
pub const DEFAULT_PROFILE_FILE: &str = "image-user-no-poto.png";

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Server-generated identifier.
    pub id: UserId,

    /// Full name.
    pub nama: String,

    /// Email address. Unique among active users by business rule.
    pub email: String,

    /// SHA-1 hex digest of the password (never exposed via API).
    #[serde(skip_serializing, default)]
    pub password: String,

    /// Phone number.
    pub no_hp: String,

    /// Birth date in `YYYY-MM-DD` form.
    pub tanggal_lahir: String,

    /// Free-form role string, `"user"` by default.
    pub role: String,

    /// Uploaded avatar file name; empty means the default avatar.
    pub profile_file: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Set when the account is soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Checks if the user is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the avatar file name, falling back to [`DEFAULT_PROFILE_FILE`].
    #[must_use]
    pub fn profile_file_or_default(&self) -> &str {
        if self.profile_file.is_empty() {
            DEFAULT_PROFILE_FILE
        } else {
            &self.profile_file
        }
    }

    /// Case-insensitive email comparison, matching the database collation.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Insert payload for a user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nama: String,
    pub email: String,
    pub password: String,
    pub no_hp: String,
    pub tanggal_lahir: String,
    pub role: String,
    pub profile_file: String,
}

impl NewUser {
    /// Materializes the row as the database would after an insert.
    #[must_use]
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            nama: self.nama,
            email: self.email,
            password: self.password,
            no_hp: self.no_hp,
            tanggal_lahir: self.tanggal_lahir,
            role: self.role,
            profile_file: self.profile_file,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            nama: "Budi".to_string(),
            email: "budi@x.com".to_string(),
            password: "digest".to_string(),
            no_hp: "0811".to_string(),
            tanggal_lahir: "1990-01-01".to_string(),
            role: DEFAULT_ROLE.to_string(),
            profile_file: String::new(),
        }
    }

    #[test]
    fn test_into_user_sets_identity_and_timestamps() {
        let now = Utc::now();
        let user = new_user().into_user(UserId::new(3), now);
        assert_eq!(user.id, UserId::new(3));
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_profile_file_defaults_only_when_empty() {
        let mut user = new_user().into_user(UserId::new(1), Utc::now());
        assert_eq!(user.profile_file_or_default(), DEFAULT_PROFILE_FILE);
        user.profile_file = "budi.png".to_string();
        assert_eq!(user.profile_file_or_default(), "budi.png");
    }

    #[test]
    fn test_has_email_ignores_case() {
        let user = new_user().into_user(UserId::new(1), Utc::now());
        assert!(user.has_email("BUDI@X.COM"));
        assert!(!user.has_email("ani@x.com"));
    }

    #[test]
    fn test_serialize_does_not_expose_password() {
        let user = new_user().into_user(UserId::new(1), Utc::now());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("digest"));
        assert!(!json.contains("password"));
    }
}
