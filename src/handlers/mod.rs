// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token verified by jwt_auth_middleware)
pub mod protected; // GET|POST /api/sections
pub mod public; // POST /api/register, POST /api/login
