use crate::app::response::{error_response, payload_response};
use crate::config::ServiceConfig;
use crate::core::extract::ExtractService;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// 各 handler 共用的狀態
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExtractService>,
}

impl AppState {
    pub fn new(service: ExtractService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "osm-extractor",
    })
}

/// POST /：GeoJSON Feature 進，PBF 出
pub async fn extract_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Rejected non-JSON body: {}", e);
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body is not valid JSON",
                Some(e.to_string()),
            );
        }
    };

    match state.service.handle(&request).await {
        Ok(payload) => payload_response(payload),
        Err(e) => e.into_response(),
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", post(extract_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let state = AppState::new(ExtractService::from_config(&config));
    let app = router(state, config.server.max_body_bytes);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!(
        "🚀 osm-extractor running on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
