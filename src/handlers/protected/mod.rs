// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// jwt_auth_middleware runs first and inserts `AuthUser` into the request
// extensions; handlers here never see unauthenticated requests.
pub mod sections;
