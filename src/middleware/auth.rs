use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{Claims, TokenError};
use crate::error::ApiError;

/// Authenticated identity extracted from the session token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Outcome of reading the Authorization header
#[derive(Debug, PartialEq, Eq)]
pub enum BearerToken<'a> {
    /// Header absent, or no credential after the scheme
    Missing,
    /// Some credential that is not a well-formed bearer token
    Unsupported,
    Present(&'a str),
}

/// JWT authentication middleware.
///
/// Missing credentials are 401; any presented credential that fails
/// verification is 403. On success `AuthUser` is placed in request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match extract_bearer(request.headers()) {
        BearerToken::Present(token) => token,
        BearerToken::Missing => {
            tracing::warn!("Rejected request to {}: missing bearer token", request.uri().path());
            return Err(ApiError::unauthorized("Access denied"));
        }
        BearerToken::Unsupported => {
            tracing::warn!(
                "Rejected request to {}: unsupported authorization scheme",
                request.uri().path()
            );
            return Err(ApiError::forbidden("Invalid token"));
        }
    };

    let claims = state.tokens.verify(token).map_err(|err| {
        match &err {
            TokenError::Expired => tracing::warn!("Rejected expired token"),
            TokenError::InvalidSignature => tracing::warn!("Rejected token with invalid signature"),
            other => tracing::warn!("Rejected token: {}", other),
        }
        ApiError::from(err)
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated user {}", auth_user.user_id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the credential from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> BearerToken<'_> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return BearerToken::Missing;
    };

    let Ok(value) = value.to_str() else {
        return BearerToken::Unsupported;
    };

    let mut parts = value.split_whitespace();
    let scheme = parts.next();
    let credential = parts.next();

    match (scheme, credential, parts.next()) {
        (None, _, _) | (Some(_), None, _) => BearerToken::Missing,
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            BearerToken::Present(token)
        }
        _ => BearerToken::Unsupported,
    }
}
