pub mod credentials;

pub use credentials::{CredentialVerifier, StaticCredentials};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Session token payload. Carries identity only; there are no roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            username: username.into(),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Token verification failed. Expired, tampered and malformed tokens are all
/// reported as this one error; the source is kept for logging only.
#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct AuthError {
    #[source]
    source: jsonwebtoken::errors::Error,
}

/// Issues and verifies HS256 session tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    pub fn issue_token(&self, username: &str) -> Result<String, JwtError> {
        self.issue_token_at(username, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_token_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::new(username, issued_at, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|source| AuthError { source })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
