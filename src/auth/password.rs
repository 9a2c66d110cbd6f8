use crate::error::AppError;
use bcrypt::{hash, verify};

/// Longest password bcrypt can hash without truncation, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way password hashing with bcrypt.
///
/// Every hash embeds its own random salt and cost, so hashing the same password
/// twice gives two different strings that both verify.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password`. Any bcrypt failure is an internal error for the caller.
    ///
    /// Passwords over [`MAX_PASSWORD_BYTES`] are refused; bcrypt would otherwise
    /// hash only their prefix.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::ValidationError(format!(
                "password: must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `true` iff `password` matches `hashed_password`.
    ///
    /// A malformed hash is treated as a mismatch, and so is a password too long
    /// to have been hashed.
    pub fn verify_password(&self, password: &str, hashed_password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}
