// handlers/protected/auth/refresh.rs - POST /auth/refresh-token handler

use axum::extract::State;
use axum::Extension;
use serde_json::{json, Value};

use roster_api::auth::{PermissionFlag, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::AppState;

/// POST /auth/refresh-token - re-issue a token for the current caller.
///
/// Claims are re-read from the store, not copied from the presented token,
/// so permission-flag changes since issue time land in the new token.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> ApiResult<Value> {
    let user = state.users.get(claims.sub).await?;

    let issued = state
        .tokens
        .issue(user.id, PermissionFlag::from_mask(user.permission_flags))?;

    tracing::info!(user_id = %user.id, "refreshed access token");

    Ok(ApiResponse::created(json!({
        "token": issued.token,
        "expiresIn": issued.expires_in,
    })))
}
