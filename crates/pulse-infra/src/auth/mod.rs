//! Local authentication: Argon2 password hashes and JWT session tokens.

mod jwt;
mod local;
mod password;

pub use jwt::{JwtConfig, JwtTokenService};
pub use local::LocalAuthProvider;
pub use password::Argon2PasswordService;
