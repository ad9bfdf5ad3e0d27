use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use roster_api::auth::TokenAuthenticator;
use roster_api::middleware::require_authentication;
use roster_api::services::UserService;
use roster_api::store::UserStore;
use roster_api::{is_production, AppState};

mod handlers;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SECURITY_JWT_SECRET etc.
    let _ = dotenvy::dotenv();

    let config = roster_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Roster API in {:?} mode", config.environment);

    // The signing key is injected here, never read from ambient state by the
    // authenticator itself.
    if is_production!() && config.security.jwt_secret.is_empty() {
        panic!("SECURITY_JWT_SECRET must be set in production");
    }

    let state = AppState {
        tokens: TokenAuthenticator::new(
            config.security.jwt_secret.as_bytes(),
            chrono::Duration::hours(config.security.jwt_expiry_hours as i64),
        ),
        users: UserService::new(UserStore::new()),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("ROSTER_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Roster API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resource routes
        .merge(auth_routes(state.clone()))
        .merge(user_routes(state))
        // Global middleware
        .layer(TraceLayer::new_for_http());

    if roster_api::config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn auth_routes(state: AppState) -> Router {
    use handlers::{protected, public};

    let gated = Router::new()
        .route("/auth/whoami", get(protected::auth::whoami))
        .route("/auth/refresh-token", post(protected::auth::refresh))
        .route_layer(from_fn_with_state(state.clone(), require_authentication));

    Router::new()
        .route("/auth", post(public::auth::login))
        .merge(gated)
        .with_state(state)
}

fn user_routes(state: AppState) -> Router {
    use handlers::{protected, public};

    let gated = Router::new()
        .route("/users", get(protected::users::list_users))
        .route(
            "/users/:id",
            get(protected::users::show_user)
                .put(protected::users::replace_user)
                .patch(protected::users::patch_user)
                .delete(protected::users::delete_user),
        )
        .route(
            "/users/:id/permissionFlags/:flags",
            put(protected::users::set_permission_flags),
        )
        .route_layer(from_fn_with_state(state.clone(), require_authentication));

    Router::new()
        .route("/users", post(public::users::create_user))
        .merge(gated)
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Roster API",
            "version": version,
            "description": "User account management REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "POST /users (public)",
                "login": "POST /auth (public - token acquisition)",
                "session": "GET /auth/whoami, POST /auth/refresh-token (protected)",
                "users": "/users[/:id] (protected - ownership or admin)",
                "permission_flags": "PUT /users/:id/permissionFlags/:flags (protected)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now()
        }
    }))
}
