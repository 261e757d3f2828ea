use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::file::user_store::UserStore;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn parse_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let addr = cfg.bind_addr();
    addr.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {addr}: {e}")))
}

/// Open the datastore named in the config and build the router over it.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let users_file = &cfg.storage.users_file;
    common::env::ensure_data_dir(users_file).await?;
    let store = UserStore::new(users_file.clone()).await?;
    let state = ServerState::new(store);
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = parse_bind_addr(&cfg)?;
    info!(%addr, users_file = %cfg.storage.users_file.display(), "starting user store server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
