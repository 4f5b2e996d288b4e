use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{PasswordError, PasswordHasher, TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::UserStore;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Shared, immutable per-process dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AppState {
    pub fn new(config: AppConfig, users: Arc<dyn UserStore>) -> Result<Self, StateError> {
        let tokens = TokenService::new(&config.security.jwt_secret)?;
        let passwords = PasswordHasher::new(config.security.bcrypt_cost)?;
        Ok(Self {
            users,
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
            config: Arc::new(config),
        })
    }
}

/// Full application router with global middleware
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let request_logging = state.config.api.enable_request_logging;
    let cors = cors_layer(&state.config.security.cors_origins);

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(cors),
        );

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn api_routes(state: AppState) -> Router<AppState> {
    // Token acquisition
    let public = Router::new()
        .route("/register", post(public::auth::register))
        .route("/login", post(public::auth::login));

    // Bearer token required
    let protected = Router::new()
        .route(
            "/sections",
            get(protected::sections::sections_get).post(protected::sections::sections_post),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Study Planner API",
        "version": version,
        "endpoints": {
            "register": "POST /api/register (public)",
            "login": "POST /api/login (public)",
            "sections": "GET|POST /api/sections (bearer token)",
            "health": "GET /health (public)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.users.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
