//! HS256 JWT implementation of the `TokenService` port.
//!
//! Tokens carry `{sub, email, iat, exp}`. Expiry is checked against the
//! injected clock rather than the system time, with no leeway.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessClaims, AccessToken, User, UserId};

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Rejected signing secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("JWT secret must be at least {min} bytes, got {actual}")]
pub struct JwtSecretError {
    pub min: usize,
    pub actual: usize,
}

/// HMAC signing secret, wiped from memory on drop.
#[derive(Clone)]
pub struct JwtSecret(Zeroizing<Vec<u8>>);

impl JwtSecret {
    /// Accept a configured secret of at least [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, JwtSecretError> {
        let bytes = secret.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(JwtSecretError {
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    /// Random secret for development runs. Tokens do not survive a restart.
    #[must_use]
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0u8; MIN_SECRET_LEN * 2];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(secret: &JwtSecret, ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `clock` in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            clock,
        }
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid("timestamp out of range"))
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        let user_id = UserId::new(&claims.sub)
            .map_err(|_| TokenError::invalid("subject is not a user id"))?;
        Ok(AccessClaims {
            user_id,
            email: claims.email,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}
