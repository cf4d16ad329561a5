//! Brand logo upload. The request body is the raw image; its type comes from
//! the `Content-Type` header.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use battlecard_core::{LogoDataUri, LogoValidationError, MAX_LOGO_BYTES};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_dashboard_error, ApiError, ApiResponse, AppState, LOGO_BODY_LIMIT};

#[derive(Debug, Serialize)]
pub(in crate::api) struct LogoData {
    /// `None` means the default logo is shown.
    pub logo: Option<LogoDataUri>,
}

pub(in crate::api) async fn get_logo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<LogoData>> {
    let logo = state.dashboard.logo().await;
    ApiResponse::new(LogoData { logo }, req_id)
}

pub(in crate::api) async fn put_logo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<LogoData>>, ApiError> {
    let body = body.map_err(|rejection| body_error(&req_id.0, &headers, &rejection))?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::new(&req_id.0, "validation_error", "missing Content-Type header"))?;

    let logo = state
        .dashboard
        .upload_logo(content_type, &body)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(LogoData { logo: Some(logo) }, req_id))
}

/// Report an unreadable upload in the usual error envelope. Bodies over the
/// buffering limit get the same size message as validation would give.
fn body_error(request_id: &str, headers: &HeaderMap, rejection: &BytesRejection) -> ApiError {
    if rejection.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(request_id, "validation_error", rejection.body_text());
    }
    let size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(LOGO_BODY_LIMIT + 1);
    tracing::debug!(size, "logo body over the buffering limit");
    let error = LogoValidationError::TooLarge {
        size,
        max: MAX_LOGO_BYTES,
    };
    ApiError::new(request_id, "validation_error", error.to_string())
}

pub(in crate::api) async fn delete_logo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<LogoData>> {
    state.dashboard.clear_logo().await;
    ApiResponse::new(LogoData { logo: None }, req_id)
}
