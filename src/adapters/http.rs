//! HTTP trigger.
//!
//! `GET /run` performs one full reconciliation run and reports which
//! contractors were activated or paused. `GET /health` reports liveness.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::errors::RunError;
use crate::domain::models::ServerConfig;
use crate::services::{RunService, RunSummary};

/// `message` of a successful run.
pub const SUCCESS_MESSAGE: &str = "Bot executed successfully";

/// Body of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    /// Always [`SUCCESS_MESSAGE`]
    pub message: String,
    /// Contractors switched to active
    pub activated: Vec<String>,
    /// Contractors switched to paused
    pub paused: Vec<String>,
}

impl From<&RunSummary> for RunResponse {
    fn from(summary: &RunSummary) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            activated: summary.activated(),
            paused: summary.paused(),
        }
    }
}

/// Error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// A failed run as an HTTP response.
pub struct RunFailure(pub RunError);

impl RunFailure {
    /// 500 for configuration problems, 409 while busy, 502 otherwise.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            RunError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RunError::DesiredState(_) | RunError::Session(_) | RunError::Audit(_) => {
                StatusCode::BAD_GATEWAY
            }
            RunError::Busy => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for RunFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Trigger server around a shared [`RunService`].
pub struct TriggerServer {
    config: ServerConfig,
    service: Arc<RunService>,
}

impl TriggerServer {
    /// Server for `service`, bound per `config`.
    pub fn new(service: Arc<RunService>, config: ServerConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn router(service: Arc<RunService>) -> Router {
        Router::new()
            .route("/run", get(trigger_run))
            .route("/health", get(health_check))
            .with_state(service)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the server.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("capsync trigger listening on {}", addr);

        axum::serve(listener, Self::router(self.service))
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn trigger_run(
    State(service): State<Arc<RunService>>,
) -> Result<Json<RunResponse>, RunFailure> {
    let summary = service.run().await.map_err(RunFailure)?;
    Ok(Json(RunResponse::from(&summary)))
}
