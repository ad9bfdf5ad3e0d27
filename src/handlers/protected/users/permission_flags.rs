// handlers/protected/users/permission_flags.rs - PUT /users/:id/permissionFlags/:flags handler

use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use roster_api::auth::{Guard, PermissionEvaluator, PermissionFlag, TokenClaims};
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::AppState;

/// PUT /users/:id/permissionFlags/:flags - overwrite a user's permission
/// mask. This is the only write path for flags; update bodies must leave
/// them untouched.
///
/// Gate chain: ownership first, then the FREE requirement. Owners can
/// self-service their own mask; administrators can set anyone's.
pub async fn set_permission_flags(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((id, flags)): Path<(Uuid, u32)>,
) -> ApiResult<()> {
    PermissionEvaluator
        .evaluate(
            &claims,
            &[
                Guard::SameIdentityOrAdmin(id),
                Guard::Flags(PermissionFlag::FREE),
            ],
        )
        .require()?;

    let user = state.users.set_permission_flags(id, flags).await?;

    tracing::info!(
        user_id = %user.id,
        flags = %PermissionFlag::from_mask(flags),
        "updated permission flags"
    );

    Ok(ApiResponse::no_content())
}
