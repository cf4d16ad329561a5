use axum::{extract::State, Extension, Json};
use battlecard_dashboard::{ChatMessage, ChatTranscript};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_dashboard_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct AskRequest {
    pub question: String,
    /// Selects this competitor before asking. Omit to ask about the current
    /// selection.
    #[serde(default)]
    pub competitor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct AskResponse {
    /// `None` when the selection changed before the answer arrived.
    pub answer: Option<ChatMessage>,
    pub transcript: ChatTranscript,
}

/// GET /api/v1/chat
pub(in crate::api) async fn get_chat(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ChatTranscript>> {
    ApiResponse::new(state.dashboard.chat_transcript().await, req_id)
}

/// POST /api/v1/chat
pub(in crate::api) async fn post_chat(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskResponse>>, ApiError> {
    if let Some(id) = body.competitor_id.as_deref() {
        state
            .dashboard
            .select(id)
            .await
            .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    }
    let answer = state
        .dashboard
        .ask(&body.question)
        .await
        .map_err(|e| map_dashboard_error(&req_id.0, &e))?;
    let transcript = state.dashboard.chat_transcript().await;
    Ok(ApiResponse::new(AskResponse { answer, transcript }, req_id))
}
