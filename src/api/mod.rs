//! Read-only HTTP API for the uptime dashboard
//!
//! ## Architecture
//!
//! - **Axum** web framework with Tower middleware
//! - **SampleStore** shared with the monitor loop, queried directly
//! - **ServeDir** for the static dashboard files
//!
//! ## Endpoints
//!
//! - `GET /api/instant` - Instant feed, oldest first
//! - `GET /api/daily` - Daily up/down counts, oldest day first
//! - `GET /api/health` - Store health
//! - `GET /api/stats` - Store row counts

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::{DailyPoint, DailyResponse, HealthResponse, InstantPoint, InstantResponse};

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{Router, routing::get};
use tracing::info;

use crate::config::DashboardConfig;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_addr: SocketAddr,

    /// Directory with the dashboard's static files
    pub static_dir: Option<PathBuf>,

    /// Enable CORS for dashboard
    pub enable_cors: bool,
}

impl From<&DashboardConfig> for ApiConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            bind_addr: config.bind_addr,
            static_dir: Some(config.static_dir.clone()),
            enable_cors: config.enable_cors,
        }
    }
}

/// Build the router without binding it
pub fn router(config: &ApiConfig, state: ApiState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    let mut app = Router::new()
        .route("/api/instant", get(routes::instant::list_instant))
        .route("/api/daily", get(routes::daily::list_daily))
        .route("/api/health", get(routes::health::health_check))
        .route("/api/stats", get(routes::stats::get_stats))
        .with_state(state);

    match &config.static_dir {
        Some(dir) if dir.is_dir() => {
            info!("serving dashboard from {}", dir.display());
            app = app.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => {
            info!("dashboard directory not found at {}", dir.display());
        }
        None => {}
    }

    app = app.layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(&config, state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
