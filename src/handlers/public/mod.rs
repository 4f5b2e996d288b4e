// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition endpoints. Inputs come from anonymous callers, so every
// field is validated here before it reaches the store.
pub mod auth;
