// handlers/protected/users/patch.rs - PATCH /users/:id handler

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use roster_api::auth::{PermissionEvaluator, PermissionFlag, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::services::UserUpdate;
use roster_api::AppState;

/// PATCH /users/:id - update the supplied fields only. Same gate order as
/// replace: ownership, body rules, then the PAID requirement.
pub async fn patch_user(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserUpdate>,
) -> ApiResult<()> {
    PermissionEvaluator
        .require_same_identity_or_admin(&claims, id)
        .require()?;

    state.users.validate_patch(id, &body).await?;

    PermissionEvaluator
        .require_flags(&claims, PermissionFlag::PAID)
        .require()?;

    state.users.patch(id, body).await?;

    Ok(ApiResponse::no_content())
}
