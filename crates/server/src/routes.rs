pub mod auth;
pub mod progress;
pub mod users;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use service::academy::AcademyService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub academy: Arc<AcademyService>,
}

/// `{"success": true}` for mutations with nothing else to report.
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub async fn root() -> &'static str {
    "Academy backend is running"
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let api = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route("/api/reset-password", post(auth::reset_password))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/training/complete", post(progress::complete_training))
        .route("/api/session/complete", post(progress::complete_session));

    public
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
