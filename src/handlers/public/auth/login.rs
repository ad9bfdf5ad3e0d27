// handlers/public/auth/login.rs - POST /auth handler

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use roster_api::auth::PermissionFlag;
use roster_api::error::ApiError;
use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::store::UserView;
use roster_api::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth - exchange credentials for a signed access token.
///
/// The issued token carries the user's current permission mask; mask changes
/// after issue time only take effect on the next login or refresh.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Value> {
    let mut field_errors = HashMap::new();
    if body.email.as_deref().map_or(true, str::is_empty) {
        field_errors.insert("email".to_string(), "Email is required".to_string());
    }
    if body.password.as_deref().map_or(true, str::is_empty) {
        field_errors.insert("password".to_string(), "Password is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid request body", Some(field_errors)));
    }

    let user = state
        .users
        .verify_credentials(&body.email.unwrap_or_default(), &body.password.unwrap_or_default())
        .await?;

    let issued = state
        .tokens
        .issue(user.id, PermissionFlag::from_mask(user.permission_flags))?;

    tracing::info!(user_id = %user.id, "issued access token");

    Ok(ApiResponse::created(json!({
        "token": issued.token,
        "expiresIn": issued.expires_in,
        "user": UserView::from(user),
    })))
}
