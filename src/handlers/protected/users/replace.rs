// handlers/protected/users/replace.rs - PUT /users/:id handler

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use roster_api::auth::{PermissionEvaluator, PermissionFlag, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::services::UserUpdate;
use roster_api::AppState;

/// PUT /users/:id - replace an account. Gate order: ownership, then body
/// rules, then the PAID requirement, so validation failures win over 403s.
pub async fn replace_user(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserUpdate>,
) -> ApiResult<()> {
    PermissionEvaluator
        .require_same_identity_or_admin(&claims, id)
        .require()?;

    state.users.validate_replace(id, &body).await?;

    PermissionEvaluator
        .require_flags(&claims, PermissionFlag::PAID)
        .require()?;

    state.users.replace(id, body).await?;

    Ok(ApiResponse::no_content())
}
