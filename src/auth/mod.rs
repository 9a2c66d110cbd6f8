//! Credential handling and the request authorization gate.
//!
//! - [`PasswordHasher`]: bcrypt hashing and verification.
//! - [`TokenIssuer`]: HS256 token signing and validation.
//! - [`AuthMiddleware`] + [`AuthenticatedAccountId`]: turn a bearer header into a
//!   verified caller identity, or reject the request with 401.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use extractors::AuthenticatedAccountId;
pub use middleware::{authenticate, bearer_token, AuthMiddleware};
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenIssuer, DEFAULT_TOKEN_TTL_HOURS};

/// Represents the payload for an account login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Account password.
    /// At least 6 characters and at most 72 bytes.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

/// Represents the payload for a new account registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// At least 6 characters and at most 72 bytes (the bcrypt input limit).
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
    /// Free-form profile text.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Rejects passwords bcrypt could not hash in full. Counts bytes, not characters.
fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account_id: i64,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The JWT (JSON Web Token) to send as `Authorization: Bearer <token>`.
    pub token: String,
}
