//! Credential adapters: Argon2id password hashing and HS256 access tokens.

mod argon2_hasher;
mod jwt_tokens;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_tokens::{JwtSecret, JwtSecretError, JwtTokenService, MIN_SECRET_LEN};
