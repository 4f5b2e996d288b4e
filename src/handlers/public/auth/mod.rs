// handlers/public/auth/mod.rs - Register and login
//
// Both endpoints answer with the same `{ "token": ... }` shape.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub mod login; // POST /api/login
pub mod register; // POST /api/register

pub use login::login;
pub use register::register;

/// Longest accepted username, in characters
pub const MAX_USERNAME_CHARS: usize = 64;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl CredentialsRequest {
    /// Shape checks shared by register and login
    fn check_present(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::field_error("username", "Username is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::field_error("password", "Password is required"));
        }
        Ok(())
    }

    fn exceeds_limits(&self) -> bool {
        self.username.chars().count() > MAX_USERNAME_CHARS
            || self.password.len() > MAX_PASSWORD_BYTES
    }

    /// Login checks. Credentials no account could hold are a plain mismatch,
    /// since bcrypt would otherwise match on the first 72 bytes alone.
    fn check_login(&self) -> Result<(), ApiError> {
        self.check_present()?;
        if self.exceeds_limits() {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(())
    }

    /// Stricter checks applied when creating an account
    fn check_new_account(&self) -> Result<(), ApiError> {
        self.check_present()?;
        if self.username.chars().count() > MAX_USERNAME_CHARS {
            return Err(ApiError::field_error(
                "username",
                format!("Username must be at most {} characters", MAX_USERNAME_CHARS),
            ));
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(ApiError::field_error(
                "password",
                format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
            ));
        }
        Ok(())
    }
}
