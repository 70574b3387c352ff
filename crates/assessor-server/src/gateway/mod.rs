//! HTTP gateway (Axum) for CV assessment.
//!
//! This module is primarily used by the `assessor` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{assess_cv_handler, assess_text_handler};
pub use state::HandlerState;

use assessor::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Outcome header on every response.
pub const ASSESSOR_STATUS_HEADER: &str = "x-assessor-status";
/// Per-request id header on assessment responses.
pub const ASSESSMENT_ID_HEADER: &str = "x-assessment-id";

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const STATUS_PAYLOAD_TOO_LARGE: &str = "payload_too_large";
pub const STATUS_PROCESSING_FAILED: &str = "processing_failed";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";

/// Router-level settings taken from [`Config`](assessor::Config).
#[derive(Debug, Clone, Copy)]
pub struct GatewayOptions {
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_permissive: false,
        }
    }
}

impl From<&assessor::Config> for GatewayOptions {
    fn from(config: &assessor::Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            cors_permissive: config.cors_permissive,
        }
    }
}

pub fn create_router_with_state(state: HandlerState, options: GatewayOptions) -> Router {
    let router = Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/assess-cv", post(assess_cv_handler))
        .route("/assess-cv/", post(assess_cv_handler))
        .route("/v1/assessments", post(assess_text_handler))
        .route("/v1/criteria", get(criteria_handler))
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if options.cors_permissive {
        tracing::warn!("Permissive CORS enabled");
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub catalog: &'static str,
    pub criteria: usize,
    pub hypotheses: usize,
    pub backend_mode: &'static str,
    pub max_concurrent: usize,
    pub available_permits: usize,
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ASSESSOR_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        status_headers(STATUS_HEALTHY),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let catalog = state.assessor.catalog();

    let components = ComponentStatus {
        http: STATUS_READY,
        catalog: STATUS_READY,
        criteria: catalog.profiles().count(),
        hypotheses: catalog.hypothesis_count(),
        backend_mode: state.assessor.backend_mode().as_str(),
        max_concurrent: state.max_concurrent,
        available_permits: state.limiter.available_permits(),
    };

    (
        StatusCode::OK,
        status_headers(STATUS_READY),
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}

/// `GET /v1/criteria`: the loaded catalog, in the catalog file format.
#[tracing::instrument(skip(state))]
pub async fn criteria_handler(State(state): State<HandlerState>) -> Response {
    (
        StatusCode::OK,
        status_headers(STATUS_COMPLETED),
        Json(state.assessor.catalog().clone()),
    )
        .into_response()
}
