// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::State;

use super::{CredentialsRequest, TokenResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

/// POST /api/login - Authenticate and receive a session token
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// Output: `200 { "token": "..." }`
///
/// Unknown usernames and wrong passwords produce the identical
/// `InvalidCredentials` response, and both paths run one bcrypt verification.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> ApiResult<TokenResponse> {
    payload.check_login().map_err(|err| {
        if matches!(err, ApiError::InvalidCredentials) {
            tracing::warn!("Login failed: credentials over length limits");
        }
        err
    })?;

    let Some(user) = state.users.find_by_username(&payload.username).await? else {
        state.passwords.verify_unknown_user(payload.password).await?;
        tracing::warn!("Login failed: unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    let valid = state
        .passwords
        .verify_blocking(payload.password, user.password_hash)
        .await?;

    if !valid {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;

    tracing::info!("User '{}' logged in", user.username);
    Ok(ApiResponse::success(TokenResponse { token }))
}
