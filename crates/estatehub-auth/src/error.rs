//! Authentication error types

use thiserror::Error;

/// Why a presented session token was not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    /// Verification failed for a reason other than the ones above
    /// (e.g. a token that is not valid yet).
    #[error("Token could not be verified: {0}")]
    Unverifiable(String),
}

impl TokenError {
    /// Short label used for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Expired => "expired",
            TokenError::Malformed => "malformed",
            TokenError::SignatureInvalid => "signature_invalid",
            TokenError::Unverifiable(_) => "unverifiable",
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No credential supplied")]
    MissingCredential,

    #[error("Credential rejected: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token lifetime exceeds the representable time range")]
    TokenLifetime,

    #[error("Token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
