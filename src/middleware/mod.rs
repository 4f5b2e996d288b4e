pub mod auth;
pub mod json;
pub mod response;

pub use auth::{extract_bearer, jwt_auth_middleware, AuthUser, BearerToken};
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};
