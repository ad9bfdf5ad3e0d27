// handlers/public/users/register.rs - POST /users handler

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use roster_api::middleware::{ApiResponse, ApiResult};
use roster_api::services::RegisterUser;
use roster_api::AppState;

/// POST /users - register a new account.
///
/// New accounts always start with the FREE flag; a mask in the request body
/// is ignored.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> ApiResult<Value> {
    let user = state.users.register(body).await?;

    tracing::info!(user_id = %user.id, "registered user");

    Ok(ApiResponse::created(json!({ "id": user.id })))
}
