// handlers/protected/users/show.rs - GET /users/:id handler

use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use roster_api::auth::{PermissionEvaluator, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::store::UserView;
use roster_api::AppState;

/// GET /users/:id - show one account. Owner or administrator only; the
/// ownership check runs before the lookup, so callers that fail the gate
/// never learn whether the id exists.
pub async fn show_user(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserView> {
    PermissionEvaluator
        .require_same_identity_or_admin(&claims, id)
        .require()?;

    let user = state.users.get(id).await?;

    Ok(ApiResponse::success(UserView::from(user)))
}
