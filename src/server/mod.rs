//! HTTP API
//!
//! `GET /health` reports versions and drivers, `POST /convert` turns a
//! base64 DXF payload into a GeoJSON FeatureCollection. Errors are returned
//! as `{"detail": "..."}` with the status of their [`ConvertError`].

pub mod handlers;

pub use handlers::HealthResponse;

use crate::config::ServiceConfig;
use crate::error::ConvertError;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// State shared by the handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub max_payload_bytes: usize,
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self, "conversion failed");
        } else {
            info!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = serde_json::json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Router with both endpoints and the body limit derived from `config`
pub fn router(config: &ServiceConfig) -> Router {
    let state = AppState {
        max_payload_bytes: config.max_payload_bytes,
    };
    Router::new()
        .route("/health", get(handlers::health))
        .route("/convert", post(handlers::convert_dxf))
        .layer(DefaultBodyLimit::max(config.body_limit()))
        .with_state(state)
}

/// The HTTP server
pub struct ApiServer {
    config: ServiceConfig,
    shutdown_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Serve until the shutdown token is cancelled
    pub async fn run(&self) -> std::io::Result<()> {
        let bind_address = self.config.bind_address();
        let listener = TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, max_payload_bytes = self.config.max_payload_bytes, "listening");

        let token = self.shutdown_token.clone();
        axum::serve(listener, router(&self.config))
            .with_graceful_shutdown(async move {
                token.cancelled().await;
                info!("shutdown requested");
            })
            .await
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }
}

/// Cancel `token` on Ctrl-C
pub async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => token.cancel(),
        Err(err) => warn!(%err, "could not listen for Ctrl-C"),
    }
}
