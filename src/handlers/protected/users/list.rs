// handlers/protected/users/list.rs - GET /users handler

use axum::extract::{Query, State};
use axum::Extension;
use serde::Deserialize;

use roster_api::auth::{PermissionEvaluator, PermissionFlag, TokenClaims};
use roster_api::config;
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::store::UserView;
use roster_api::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

/// GET /users - list accounts in creation order. Administrators only.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<UserView>> {
    PermissionEvaluator
        .require_flags(&claims, PermissionFlag::ADMIN)
        .require()?;

    let limit = query.limit.unwrap_or(config::config().api.default_page_size);
    let users = state.users.list(limit, query.page.unwrap_or(0)).await;

    Ok(ApiResponse::success(users))
}
