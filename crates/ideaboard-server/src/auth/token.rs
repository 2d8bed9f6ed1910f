//! Identity tokens.
//!
//! Tokens are HS256-signed JWTs carrying `{id, username, role}` and expire
//! seven days after issuance. The signing secret is process-wide and comes
//! from configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use ideaboard_shared::constants::TOKEN_TTL_SECS;
use ideaboard_shared::Identity;
use ideaboard_store::User;

use crate::error::ServerError;

/// Payload stored in the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl From<Claims> for Identity {
    fn from(c: Claims) -> Self {
        Identity {
            id: c.id,
            username: c.username,
            role: c.role,
        }
    }
}

/// Issues and verifies identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, TOKEN_TTL_SECS)
    }

    pub fn with_ttl(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        self.issue_for(&Identity {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        })
    }

    pub fn issue_for(&self, identity: &Identity) -> Result<String, ServerError> {
        let now = unix_now()?;
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            role: identity.role.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ServerError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Verify a token. Expired, malformed and wrongly-signed tokens are
    /// all [`ServerError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Identity, ServerError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.into()),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::InvalidSignature => "bad signature",
                    _ => "malformed",
                };
                tracing::debug!(reason, "token rejected");
                Err(ServerError::InvalidToken)
            }
        }
    }

    /// Verify a token if one is present. Never fails.
    pub fn optional_verify(&self, token: Option<&str>) -> Option<Identity> {
        token.and_then(|t| self.verify(t).ok())
    }
}

fn unix_now() -> Result<u64, ServerError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| ServerError::Internal(format!("System time error: {e}")))
}
