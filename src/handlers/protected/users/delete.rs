// handlers/protected/users/delete.rs - DELETE /users/:id handler

use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use roster_api::auth::{PermissionEvaluator, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::AppState;

/// DELETE /users/:id - remove an account. Owner or administrator only.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    PermissionEvaluator
        .require_same_identity_or_admin(&claims, id)
        .require()?;

    state.users.remove(id).await?;

    tracing::info!(user_id = %id, "deleted user");

    Ok(ApiResponse::no_content())
}
