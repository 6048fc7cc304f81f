//! Password hashing using unsalted SHA-1.
//!
//! Stored credentials are lowercase hex SHA-1 digests of the plaintext.
//! This is weak against offline attacks and is kept only so existing
//! accounts can still log in.

use sha1::{Digest, Sha1};
use sidesa_core::{SidesaError, SidesaResult};
use tracing::debug;

/// Length of a hex-encoded SHA-1 digest.
pub const SHA1_HEX_LEN: usize = 40;

/// Interface for password hashing operations.
///
/// Services hold this behind `Arc<dyn PasswordHasherInterface>` so tests can
/// substitute a mock.
pub trait PasswordHasherInterface: Send + Sync {
    /// Hashes a password into its stored form.
    fn hash(&self, password: &str) -> String;

    /// Verifies a password against a stored digest.
    ///
    /// Returns an error when the stored digest is malformed.
    fn verify(&self, password: &str, digest: &str) -> SidesaResult<bool>;
}

/// Password hasher producing lowercase hex SHA-1 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1PasswordHasher;

impl Sha1PasswordHasher {
    /// Creates a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn digest(password: &str) -> [u8; 20] {
        let mut hasher = Sha1::new();
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

impl PasswordHasherInterface for Sha1PasswordHasher {
    fn hash(&self, password: &str) -> String {
        hex::encode(Self::digest(password))
    }

    fn verify(&self, password: &str, digest: &str) -> SidesaResult<bool> {
        if digest.len() != SHA1_HEX_LEN {
            return Err(SidesaError::Internal(format!(
                "Invalid password digest length: {}",
                digest.len()
            )));
        }
        let stored = hex::decode(digest)
            .map_err(|e| SidesaError::Internal(format!("Invalid password digest format: {}", e)))?;

        let computed = Self::digest(password);
        let diff = stored
            .iter()
            .zip(computed.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        let matches = diff == 0;
        debug!(matches, "Password verification finished");
        Ok(matches)
    }
}
