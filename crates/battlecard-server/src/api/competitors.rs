//! Competitor list, detail, mutations, section views and exports.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use battlecard_core::{CompetitorProfile, SectionType};
use battlecard_dashboard::{CompetitorSummary, RefreshReport, SectionView};
use battlecard_export::ExportFormat;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_dashboard_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateCompetitorRequest {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DeletedCompetitor {
    pub id: String,
    /// Selection after the delete, which moves if the deleted profile was
    /// selected.
    pub selected: String,
}

/// GET /api/v1/competitors
pub(in crate::api) async fn list_competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CompetitorSummary>>> {
    ApiResponse::new(state.dashboard.list().await, req_id)
}

/// POST /api/v1/competitors: generate, store and select a new profile.
pub(in crate::api) async fn create_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateCompetitorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CompetitorProfile>>), ApiError> {
    let profile = state
        .dashboard
        .add_competitor(&body.name, &body.url)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok((StatusCode::CREATED, ApiResponse::new(profile, req_id)))
}

/// POST /api/v1/competitors/refresh: regenerate every profile concurrently.
pub(in crate::api) async fn refresh_all(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RefreshReport>> {
    ApiResponse::new(state.dashboard.refresh_all().await, req_id)
}

/// GET /api/v1/competitors/{id}
pub(in crate::api) async fn get_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CompetitorProfile>>, ApiError> {
    let profile = state
        .dashboard
        .profile(&id)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(profile, req_id))
}

/// DELETE /api/v1/competitors/{id}
pub(in crate::api) async fn delete_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedCompetitor>>, ApiError> {
    let removed = state
        .dashboard
        .delete(&id)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    let data = DeletedCompetitor {
        id: removed.id,
        selected: state.dashboard.selected_id().await,
    };
    Ok(ApiResponse::new(data, req_id))
}

/// POST /api/v1/competitors/{id}/refresh
pub(in crate::api) async fn refresh_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CompetitorProfile>>, ApiError> {
    let profile = state
        .dashboard
        .refresh(&id)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(profile, req_id))
}

/// GET /api/v1/competitors/{id}/sections/{section}
pub(in crate::api) async fn get_section(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((id, section)): Path<(String, String)>,
) -> Result<Json<ApiResponse<SectionView>>, ApiError> {
    let section: SectionType = section.parse().map_err(|e: battlecard_core::CoreError| {
        ApiError::new(&req_id.0, "validation_error", e.to_string())
    })?;
    let view = state
        .dashboard
        .render(&id, section)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(view, req_id))
}

/// GET /api/v1/competitors/{id}/export/{format}: the rendered file as an
/// attachment.
pub(in crate::api) async fn export_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse().map_err(|e: battlecard_export::ExportError| {
        ApiError::new(&req_id.0, "validation_error", e.to_string())
    })?;
    let file = state
        .dashboard
        .export(&id, format)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
