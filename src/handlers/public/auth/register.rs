// handlers/public/auth/register.rs - POST /api/register handler

use axum::extract::State;

use super::{CredentialsRequest, TokenResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

/// POST /api/register - Create an account and receive a session token
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// Output: `201 { "token": "..." }`
///
/// Username uniqueness is decided by the store's insert, not by a lookup
/// beforehand, so two concurrent registrations cannot both succeed.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> ApiResult<TokenResponse> {
    payload.check_new_account()?;

    let password_hash = state.passwords.hash_blocking(payload.password).await?;

    let user = state
        .users
        .create(&payload.username, &password_hash)
        .await
        .map_err(|err| {
            tracing::warn!("Registration for '{}' failed: {}", payload.username, err);
            ApiError::from(err)
        })?;

    let token = state.tokens.issue(user.id)?;

    tracing::info!("Registered user '{}' ({})", user.username, user.id);
    Ok(ApiResponse::created(TokenResponse { token }))
}
