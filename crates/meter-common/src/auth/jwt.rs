//! JWT utilities for authentication
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken` crate.
//! Tokens carry the user's email as subject and are signed with a shared HMAC secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Issued access token, shaped like an OAuth2 token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// `access_token_expiry` is in seconds.
    #[must_use]
    pub fn new(secret: &str, algorithm: Algorithm, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_token_expiry,
        }
    }

    #[must_use]
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Issue an access token for a user email
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, email: &str) -> Result<AccessToken, AppError> {
        self.issue_with_expiry(email, self.access_token_expiry)
    }

    /// Issue an access token with an explicit lifetime in seconds
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_with_expiry(&self, email: &str, expiry: i64) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: Some(expiry),
        })
    }

    /// Decode and validate a token
    ///
    /// Every failure is reported as `AppError::Unauthorized`; the cause is only logged.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, badly signed, expired, or has no subject
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AppError::Unauthorized
            })?
            .claims;

        if claims.sub.trim().is_empty() {
            debug!("Token rejected: empty subject");
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}
