//! HTTP API.
//!
//! Every route lives under `/api` behind the per-IP rate limiter, CORS and
//! request tracing. Handlers parse the request, hand a closure to the
//! [`Gateway`] and serialize what comes back; the rules themselves live in
//! [`crate::services`].

mod auth;
mod extract;
mod engagement;
mod ideas;

use std::sync::Arc;

use axum::{
    http::Method,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use ideaboard_shared::constants::API_VERSION;

use crate::auth::TokenService;
use crate::config::ServerConfig;
use crate::gateway::Gateway;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub tokens: TokenService,
    pub rate_limiter: RateLimiter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, gateway: Gateway) -> Self {
        Self {
            gateway,
            tokens: TokenService::new(config.signing_secret()),
            rate_limiter: RateLimiter::per_window(
                config.rate_limit_max,
                config.rate_limit_window_secs,
            ),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/users/:id/role", patch(auth::set_role))
        .route("/ideas", get(ideas::list).post(ideas::create))
        .route("/ideas/tags", get(ideas::tags))
        .route("/ideas/:id", get(ideas::get_one))
        .route(
            "/ideas/:id/progress",
            get(ideas::progress_history).patch(ideas::update_progress),
        )
        .route(
            "/ideas/:id/comments",
            get(engagement::list_comments).post(engagement::add_comment),
        )
        .route("/ideas/:id/like", post(engagement::toggle_like))
        .route("/activity", get(engagement::activity));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: API_VERSION,
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
