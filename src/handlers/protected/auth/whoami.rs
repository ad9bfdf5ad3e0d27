// handlers/protected/auth/whoami.rs - GET /auth/whoami handler

use axum::Extension;
use serde_json::{json, Value};

use roster_api::auth::TokenClaims;
use roster_api::middleware::ApiResponse;

/// GET /auth/whoami - view of the caller's validated claims.
pub async fn whoami(Extension(claims): Extension<TokenClaims>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "id": claims.sub,
        "permissionFlags": claims.permissions,
        "permissions": claims.flags().names(),
        "issuedAt": claims.iat,
        "expiresAt": claims.exp,
    }))
}
