pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordHasher, MAX_COST, MIN_COST};
pub use token::{Claims, TokenError, TokenService, TOKEN_TTL_SECS};
