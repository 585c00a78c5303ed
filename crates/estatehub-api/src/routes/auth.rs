//! Signup, signin and signout

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
    routing::post,
};
use estatehub_core::CoreError;
use tracing::info;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

use super::types::{MessageResponse, SigninRequest, SigninResponse, SignupRequest};

/// Build a header map carrying a single `Set-Cookie`
pub(crate) fn set_cookie(value: String) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(&value)
        .map_err(|e| ApiError::Internal(format!("Invalid cookie header: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, value);
    Ok(headers)
}

/// POST /auth/signup
async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.signup(request.into()).await?;
    metrics::counter!("estatehub_signups_total").increment(1);
    info!("New account registered: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("User created successfully!")),
    ))
}

/// POST /auth/signin
async fn signin(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let signed_in = match state.accounts.signin(&request.email, &request.password).await {
        Ok(signed_in) => signed_in,
        Err(e) => {
            let outcome = match &e {
                CoreError::NotFound(_) => "unknown_user",
                CoreError::Auth(_) => "wrong_password",
                _ => "error",
            };
            metrics::counter!("estatehub_signins_total", "outcome" => outcome).increment(1);
            return Err(e.into());
        }
    };
    metrics::counter!("estatehub_signins_total", "outcome" => "success").increment(1);

    let headers = set_cookie(state.cookies.session_cookie(&signed_in.token))?;
    Ok((
        headers,
        Json(SigninResponse {
            user: signed_in.user,
            token: signed_in.token,
        }),
    ))
}

/// POST /auth/signout
///
/// Tokens are stateless; signing out only drops the cookie.
async fn signout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let headers = set_cookie(state.cookies.clear_cookie())?;
    Ok((
        headers,
        Json(MessageResponse::ok("User has been logged out!")),
    ))
}

/// Create auth routes (all public)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}
