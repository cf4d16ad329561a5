mod chat;
mod competitors;
mod logo;
mod selection;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use battlecard_core::MAX_LOGO_BYTES;
use battlecard_dashboard::{Dashboard, DashboardError, DashboardStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Bodies up to this size reach logo validation, which reports the size
/// against [`MAX_LOGO_BYTES`]. Larger bodies are cut off while buffering.
const LOGO_BODY_LIMIT: usize = 4 * MAX_LOGO_BYTES;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, req_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(req_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "generation_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_dashboard_error(request_id: &str, error: &DashboardError) -> ApiError {
    let code = match error {
        DashboardError::NotFound(_) => "not_found",
        DashboardError::LastProfile => "conflict",
        DashboardError::MissingUrl(_)
        | DashboardError::InvalidInput(_)
        | DashboardError::EmptyQuestion
        | DashboardError::Logo(_) => "validation_error",
        DashboardError::Generation(e) => {
            tracing::warn!(error = %e, "profile generation failed");
            "generation_failed"
        }
        DashboardError::Export(e) => {
            tracing::error!(error = %e, "export failed");
            "internal_error"
        }
    };
    ApiError::new(request_id, code, error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([header::CONTENT_DISPOSITION, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        .route(
            "/api/v1/competitors",
            get(competitors::list_competitors).post(competitors::create_competitor),
        )
        .route(
            "/api/v1/competitors/refresh",
            post(competitors::refresh_all),
        )
        .route(
            "/api/v1/competitors/{id}",
            get(competitors::get_competitor).delete(competitors::delete_competitor),
        )
        .route(
            "/api/v1/competitors/{id}/refresh",
            post(competitors::refresh_competitor),
        )
        .route(
            "/api/v1/competitors/{id}/sections/{section}",
            get(competitors::get_section),
        )
        .route(
            "/api/v1/competitors/{id}/export/{format}",
            get(competitors::export_competitor),
        )
        .route(
            "/api/v1/selection",
            get(selection::get_selection).put(selection::put_selection),
        )
        .route(
            "/api/v1/logo",
            get(logo::get_logo)
                .put(logo::put_logo)
                .delete(logo::delete_logo)
                .layer(DefaultBodyLimit::max(LOGO_BODY_LIMIT)),
        )
        .route("/api/v1/chat", get(chat::get_chat).post(chat::post_chat))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::new(HealthData { status: "ok" }, req_id)
}

async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<DashboardStatus>> {
    ApiResponse::new(state.dashboard.status().await, req_id)
}


#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_tests;
