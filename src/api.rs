//! HTTP boundary for the tool service
//!
//! Routes are nested under `/api`. Client errors (missing fields, unknown tool,
//! bad parameters) are answered with a 4xx status; everything that fails while
//! a tool runs is reported inside a `200` JSON-RPC envelope.

use crate::error::ToolError;
use crate::tools::{ToolDescriptor, ToolDispatcher, ToolInvocationRequest};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<ToolDispatcher>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Wraps a dispatcher; uptime is measured from this call
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            dispatcher,
            started_at: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Service uptime in seconds
    pub uptime: u64,
    /// Repositories currently held in the code cache
    pub cached_repositories: usize,
}

/// Body returned alongside a 4xx status
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Numeric HTTP status, repeated in the body
    pub status_code: u16,
    /// Human readable cause
    pub message: String,
    /// Canonical reason phrase of the status
    pub error: String,
}

/// A client error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(ToolError);

impl From<ToolError> for ApiError {
    fn from(error: ToolError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.0.to_string(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/tools/list", post(list_tools))
        .route("/tools/execute", post(execute_tool))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.dispatcher.list_tools())
}

async fn execute_tool(State(state): State<AppState>, body: Bytes) -> Response {
    // Parsed by hand so malformed bodies get the same error shape as validation failures.
    let request: ToolInvocationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected malformed request body: {}", e);
            return ApiError(ToolError::Validation(format!("Invalid request: {}", e)))
                .into_response();
        }
    };

    match state.dispatcher.execute(request).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            info!("Rejected tool request: {}", e);
            ApiError(e).into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.dispatcher.cache();
    cache.purge_expired().await;
    let now = Utc::now();
    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "ok".to_string(),
        timestamp: now,
        uptime: (now - state.started_at).num_seconds().max(0) as u64,
        cached_repositories: cache.len().await,
    })
}
