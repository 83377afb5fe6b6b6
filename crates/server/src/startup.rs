use std::{net::SocketAddr, sync::Arc};

use axum::http::{header, Method};
use axum::Router;
use configs::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    academy::AcademyService,
    runtime,
    storage::{JsonFileStorage, StateStorage},
};

/// Any origin; the methods and headers the academy frontend sends.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Config file if present, environment otherwise.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Bootstrap the store from `storage` and wrap it in the router.
pub async fn build_app_with_storage(
    cfg: &AppConfig,
    storage: Arc<dyn StateStorage>,
) -> Result<Router, StartupError> {
    let academy = AcademyService::bootstrap(storage, cfg.storage.on_corrupt).await?;
    let state = ServerState { academy: Arc::new(academy) };
    Ok(routes::build_router(state, build_cors(), cfg.server.max_body_bytes))
}

/// Router backed by the JSON data file named in `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.storage.path).await?;
    let storage = Arc::new(JsonFileStorage::new(&cfg.storage.path));
    info!(path = %storage.path().display(), "using data file");
    build_app_with_storage(cfg, storage).await
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = load_config()?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, max_body_bytes = cfg.server.max_body_bytes, "starting academy server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
