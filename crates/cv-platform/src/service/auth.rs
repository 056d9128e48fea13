//! Authentication Service
//!
//! Issues and validates HS256 session tokens. Tokens are stateless: there is
//! no session table, so a token stays valid until it expires.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlatformError, Result};

/// Token service configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret, read-only after startup
    pub secret_key: String,
    pub issuer: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn from_settings(settings: &cv_config::AuthSettings) -> Self {
        Self {
            secret_key: settings.jwt_secret.clone(),
            issuer: settings.issuer.clone(),
            token_ttl: settings.token_ttl(),
        }
    }
}

/// Claim set carried inside the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id, decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Claims that survived signature and expiry checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Result<Self> {
        if config.secret_key.is_empty() {
            return Err(PlatformError::Configuration {
                message: "token signing secret is empty".to_string(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
            issuer: config.issuer,
            token_ttl: config.token_ttl,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Sign a token for `user_id` expiring one TTL from now.
    pub fn issue(&self, user_id: i64) -> Result<IssuedToken> {
        self.issue_at(user_id, Utc::now())
    }

    /// Sign a token as if issued at `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<IssuedToken> {
        let ttl = chrono::Duration::from_std(self.token_ttl).map_err(|e| PlatformError::Configuration {
            message: format!("token TTL out of range: {}", e),
        })?;
        let expires_at = now + ttl;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::Internal {
                message: format!("failed to sign token: {}", e),
            })?;

        debug!(user_id, expires_at = %expires_at, "Issued session token");
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate structure, then signature, then expiry.
    ///
    /// `jsonwebtoken::decode` checks the signature before deserializing the
    /// claim set, so no claim is read from an unverified token.
    pub fn validate(&self, token: &str) -> Result<VerifiedClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => PlatformError::BadSignature,
                JwtErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                other => PlatformError::MalformedToken {
                    message: format!("{:?}", other),
                },
            })?;

        let claims = data.claims;
        let user_id = claims.sub.parse::<i64>().map_err(|_| PlatformError::MalformedToken {
            message: "subject is not a user id".to_string(),
        })?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| PlatformError::MalformedToken {
                message: "expiry out of range".to_string(),
            })?;

        Ok(VerifiedClaims { user_id, expires_at })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
