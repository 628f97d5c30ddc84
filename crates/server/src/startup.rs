use std::{path::Path, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{file::roster_store::RosterFileStore, roster::RosterService, runtime};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the file-backed roster into a router according to `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let data_file = Path::new(&cfg.storage.data_file);
    runtime::ensure_env(&cfg.static_files.dir, data_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let store = RosterFileStore::new(data_file);
    info!(data_file = %store.path().display(), "roster file store ready");
    let roster = Arc::new(RosterService::new(store));

    let state = ServerState::new(roster, cfg.admin.api_key.clone());
    if state.admin_api_key.is_none() {
        warn!("admin routes are open; set ADMIN_API_KEY to require an X-API-Key header");
    }

    Ok(routes::build_router(state, &cfg.static_files.dir, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    let local = listener.local_addr().map_err(anyhow::Error::from)?;
    info!(addr = %local, "roster server listening");
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
