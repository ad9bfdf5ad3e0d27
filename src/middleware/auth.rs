// middleware/auth.rs - bearer-token authentication gate

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::AppState;

/// Authenticate a request before it reaches a protected handler.
///
/// On success the validated `TokenClaims` are inserted into request
/// extensions for handlers to read. Every failure maps to a 401 envelope;
/// the specific reason is logged so "no token" and "bad token" stay
/// distinguishable in the logs.
pub async fn require_authentication(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            tracing::warn!(reason = %AuthError::MalformedToken, "rejected unauthenticated request");
            ApiError::from(AuthError::MalformedToken)
        })?),
        None => None,
    };

    let claims = state.tokens.authenticate(authorization).map_err(|err| {
        tracing::warn!(reason = %err, "rejected unauthenticated request");
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
