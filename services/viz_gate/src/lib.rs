pub mod api;
pub mod config;
pub mod error;
pub mod service;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use viz_adapter::{AdapterError, ContentReader};
use viz_cache::{DataCache, FsGrid, GridCache, GridMap, MemoryGrid};

pub use config::{GateConfig, GridBackend};
pub use service::VizService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VizService>,
    pub config: Arc<GateConfig>,
}

impl AppState {
    /// Wire the service from configuration, with the grid chosen by `config.grid`.
    pub fn from_config(config: GateConfig) -> Result<Self, AdapterError> {
        let grid: Arc<dyn GridMap> = match &config.grid {
            GridBackend::Memory => Arc::new(MemoryGrid::new(config.grid_map.clone())),
            GridBackend::Fs(dir) => Arc::new(FsGrid::new(dir.clone(), config.grid_map.clone())),
        };
        Self::with_grid(config, grid)
    }

    /// Wire the service over an explicit grid client.
    pub fn with_grid(config: GateConfig, grid: Arc<dyn GridMap>) -> Result<Self, AdapterError> {
        let reader = ContentReader::new(config.fetch.clone())?;
        let cache = GridCache::new(grid);
        let data = DataCache::new(Arc::new(cache), reader.clone());
        let service = VizService::new(data, reader, config.asset_base.clone());
        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(config),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let timeout = state.config.request_timeout;
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/interpret/d3",
            post(api::create_visualization).get(api::create_page),
        )
        .route("/interpret/match", get(api::match_existing))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

pub mod test {
    use super::AppState;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Spawn the server on a random port. Returns the address and a
    /// JoinHandle that keeps the server alive until dropped.
    pub async fn spawn(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let app = super::app(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, handle)
    }
}
