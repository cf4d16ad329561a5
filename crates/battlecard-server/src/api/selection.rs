use axum::{extract::State, Extension, Json};
use battlecard_core::CompetitorProfile;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_dashboard_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct Selection {
    pub id: String,
    pub profile: CompetitorProfile,
}

/// GET /api/v1/selection
pub(in crate::api) async fn get_selection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Selection>>, ApiError> {
    let profile = state
        .dashboard
        .selected()
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    let data = Selection {
        id: profile.id.clone(),
        profile,
    };
    Ok(ApiResponse::new(data, req_id))
}

/// PUT /api/v1/selection: switching competitors also resets the chat.
pub(in crate::api) async fn put_selection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<ApiResponse<Selection>>, ApiError> {
    state
        .dashboard
        .select(&body.id)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    let profile = state
        .dashboard
        .profile(&body.id)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(
        Selection {
            id: body.id,
            profile,
        },
        req_id,
    ))
}
