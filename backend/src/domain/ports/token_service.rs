//! Port for issuing and verifying bearer access tokens.

use crate::domain::{AccessClaims, AccessToken, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "invalid token: {message}",
        /// The token verified but is past its expiry.
        Expired => "token expired",
    }
}

/// Issues signed access tokens and verifies presented ones.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `user`, valid from the adapter's current time.
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError>;

    /// Verify `token` and return its claims.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
