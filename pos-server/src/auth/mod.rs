//! Authentication Module
//!
//! JWT issuance/validation, Argon2 password hashing and the request
//! middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
