//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AuthError, TokenError};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT manager for token generation and validation
///
/// Keys are derived once from the configured secret. Rotating the secret
/// means building a new manager, which invalidates every token issued by
/// the old one.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for a subject
    pub fn issue(&self, subject_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::TokenLifetime)?;

        let claims = Claims {
            sub: subject_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for subject: {}", subject_id);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Verify a token and return the subject it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                    ErrorKind::InvalidToken
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_)
                    | ErrorKind::MissingRequiredClaim(_)
                    | ErrorKind::InvalidAlgorithm => TokenError::Malformed,
                    _ => TokenError::Unverifiable(e.to_string()),
                }
            })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
