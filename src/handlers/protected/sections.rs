// handlers/protected/sections.rs - GET|POST /api/sections

use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::Section;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveConfirmation {
    pub message: String,
}

/// GET /api/sections - The caller's sections, in stored order
pub async fn sections_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Section>> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for user {} outlived the user record", auth.user_id);
            ApiError::not_found("User not found")
        })?;

    Ok(ApiResponse::success(user.sections))
}

/// POST /api/sections - Replace the caller's whole sections list
///
/// The body is the complete new list. Nothing is merged with what was stored;
/// concurrent saves for one user resolve as last write wins.
pub async fn sections_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(sections): ApiJson<Vec<Section>>,
) -> ApiResult<SaveConfirmation> {
    state.users.replace_sections(auth.user_id, &sections).await?;

    tracing::debug!("Saved {} sections for user {}", sections.len(), auth.user_id);
    Ok(ApiResponse::success(SaveConfirmation {
        message: "Sections saved successfully".to_string(),
    }))
}
