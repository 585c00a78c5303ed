//! Session middleware for the protected routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use estatehub_auth::{AuthError, AuthenticatedIdentity, TokenSource, extract_session_token};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

fn rejection_reason(err: &AuthError) -> &'static str {
    match err {
        AuthError::MissingCredential => "missing",
        AuthError::Token(e) => e.reason(),
        _ => "other",
    }
}

fn reject(err: AuthError, source: Option<TokenSource>) -> ApiError {
    let reason = rejection_reason(&err);
    debug!(
        reason,
        source = source.map(|s| s.as_str()).unwrap_or("none"),
        "Rejected session"
    );
    metrics::counter!("estatehub_auth_rejections_total", "reason" => reason).increment(1);
    ApiError::Auth(err)
}

/// Require a valid session token.
///
/// On success the verified `AuthenticatedIdentity` is attached to the
/// request extensions; handlers read it with the `Authenticated` extractor.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = extract_session_token(request.headers()).map_err(|e| reject(e, None))?;

    let subject_id = state
        .jwt
        .verify(&session.token)
        .map_err(|e| reject(AuthError::Token(e), Some(session.source)))?;

    debug!(
        "Authenticated user {} via {}",
        subject_id,
        session.source.as_str()
    );
    request
        .extensions_mut()
        .insert(AuthenticatedIdentity::new(subject_id, session.source));

    Ok(next.run(request).await)
}
