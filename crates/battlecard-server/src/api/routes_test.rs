use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use battlecard_core::{derive_profile_id, BrandContext, CompetitorProfile};
use battlecard_gemini::{GenerationError, ProfileGenerator};
use battlecard_store::MemoryStorage;
use chrono::Utc;
use tower::ServiceExt;

use super::{build_app, AppState};
use crate::middleware::REQUEST_ID_HEADER;

/// Generates from the bundled Hootsuite card; fails for "Broken".
struct StubGenerator;

#[async_trait]
impl ProfileGenerator for StubGenerator {
    async fn generate_profile(
        &self,
        name: &str,
        url: &str,
        existing_id: Option<&str>,
    ) -> Result<CompetitorProfile, GenerationError> {
        if name == "Broken" {
            return Err(GenerationError::EmptyResponse);
        }
        let now = Utc::now();
        let mut profile = battlecard_store::default_profiles(now).expect("defaults")["hootsuite"].clone();
        profile.id = existing_id.map_or_else(|| derive_profile_id(name, now), str::to_string);
        profile.name = name.to_string();
        profile.url = url.to_string();
        profile.last_updated = Some(now);
        Ok(profile)
    }

    async fn answer_question(&self, _question: &str, _context: &str) -> String {
        "Stub answer.".to_string()
    }
}

fn app() -> Router {
    let dashboard = battlecard_dashboard::Dashboard::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(StubGenerator),
        BrandContext::default(),
    );
    build_app(AppState {
        dashboard: Arc::new(dashboard),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_echoes_request_id() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[tokio::test]
async fn lists_default_competitors_with_first_selected() {
    let app = app();
    let (status, json) = send(&app, get("/api/v1/competitors")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["data"].as_array().expect("data array");
    let ids: Vec<&str> = rows.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, ["buffer", "hootsuite", "sprout_social"]);
    assert_eq!(rows[0]["selected"], true);
    assert_eq!(rows[1]["selected"], false);
}

#[tokio::test]
async fn unknown_competitor_is_not_found() {
    let (status, json) = send(&app(), get("/api/v1/competitors/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_rejects_non_http_url() {
    let body = serde_json::json!({ "name": "Later", "url": "later.com" });
    let (status, json) = send(&app(), json_request("POST", "/api/v1/competitors", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn create_stores_and_selects_new_profile() {
    let app = app();
    let body = serde_json::json!({ "name": "Later", "url": "https://later.com" });
    let (status, json) = send(&app, json_request("POST", "/api/v1/competitors", &body)).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().expect("id").to_string();
    assert!(id.starts_with("later_"), "{id}");
    assert_eq!(json["data"]["name"], "Later");

    let (_, selection) = send(&app, get("/api/v1/selection")).await;
    assert_eq!(selection["data"]["id"], id.as_str());

    let (_, list) = send(&app, get("/api/v1/competitors")).await;
    assert_eq!(list["data"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn failed_generation_is_bad_gateway_and_stores_nothing() {
    let app = app();
    let body = serde_json::json!({ "name": "Broken", "url": "https://broken.example" });
    let (status, json) = send(&app, json_request("POST", "/api/v1/competitors", &body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "generation_failed");

    let (_, list) = send(&app, get("/api/v1/competitors")).await;
    assert_eq!(list["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn refresh_keeps_id_and_advances_timestamp() {
    let app = app();
    let (_, before) = send(&app, get("/api/v1/competitors/hootsuite")).await;
    let (status, after) = send(&app, empty_request("POST", "/api/v1/competitors/hootsuite/refresh")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["data"]["id"], "hootsuite");
    let old = before["data"]["lastUpdated"].as_i64().expect("old stamp");
    let new = after["data"]["lastUpdated"].as_i64().expect("new stamp");
    assert!(new > old, "{new} should be after {old}");
}

#[tokio::test]
async fn delete_moves_selection_and_refuses_last_profile() {
    let app = app();
    let (status, json) = send(&app, empty_request("DELETE", "/api/v1/competitors/buffer")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], "buffer");
    assert_eq!(json["data"]["selected"], "hootsuite");

    let (status, _) = send(&app, empty_request("DELETE", "/api/v1/competitors/hootsuite")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, empty_request("DELETE", "/api/v1/competitors/sprout_social")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "conflict");
}

#[tokio::test]
async fn section_view_is_tagged_and_unknown_section_rejected() {
    let app = app();
    let (status, json) = send(&app, get("/api/v1/competitors/buffer/sections/pricing")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["section"], "pricing");

    let (status, json) = send(&app, get("/api/v1/competitors/buffer/sections/gossip")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn export_sets_download_headers() {
    let response = app()
        .oneshot(get("/api/v1/competitors/buffer/export/csv"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"Analysis_Swatio_vs_Buffer.csv\"")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert!(String::from_utf8_lossy(&body).contains("Buffer"));
}

#[tokio::test]
async fn pdf_export_is_a_pdf() {
    let response = app()
        .oneshot(get("/api/v1/competitors/hootsuite/export/pdf"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert!(body.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn unknown_export_format_is_rejected() {
    let (status, json) = send(&app(), get("/api/v1/competitors/buffer/export/xlsx")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn put_selection_switches_and_rejects_unknown() {
    let app = app();
    let body = serde_json::json!({ "id": "sprout_social" });
    let (status, json) = send(&app, json_request("PUT", "/api/v1/selection", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], "sprout_social");
    assert_eq!(json["data"]["profile"]["name"], "Sprout Social");

    let body = serde_json::json!({ "id": "ghost" });
    let (status, _) = send(&app, json_request("PUT", "/api/v1/selection", &body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, selection) = send(&app, get("/api/v1/selection")).await;
    assert_eq!(selection["data"]["id"], "sprout_social");
}

#[tokio::test]
async fn logo_upload_validates_and_clears() {
    let app = app();

    let missing_type = Request::builder()
        .method("PUT")
        .uri("/api/v1/logo")
        .body(Body::from("<svg/>"))
        .expect("request");
    let (status, _) = send(&app, missing_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let gif = Request::builder()
        .method("PUT")
        .uri("/api/v1/logo")
        .header(header::CONTENT_TYPE, "image/gif")
        .body(Body::from("GIF89a"))
        .expect("request");
    let (status, json) = send(&app, gif).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let svg = Request::builder()
        .method("PUT")
        .uri("/api/v1/logo")
        .header(header::CONTENT_TYPE, "image/svg+xml")
        .body(Body::from(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#))
        .expect("request");
    let (status, json) = send(&app, svg).await;
    assert_eq!(status, StatusCode::OK);
    let uri = json["data"]["logo"].as_str().expect("logo uri");
    assert!(uri.starts_with("data:image/svg+xml;base64,"), "{uri}");

    let (_, json) = send(&app, get("/api/v1/logo")).await;
    assert_eq!(json["data"]["logo"].as_str(), Some(uri));

    let (status, json) = send(&app, empty_request("DELETE", "/api/v1/logo")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["logo"].is_null());

    let (_, json) = send(&app, get("/api/v1/logo")).await;
    assert!(json["data"]["logo"].is_null());
}

#[tokio::test]
async fn oversized_logo_reports_size_limit() {
    let mut png = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    png.resize(2 * 1024 * 1024, 0);
    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/logo")
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(png))
        .expect("request");

    let (status, json) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"]["message"].as_str().expect("message");
    assert!(message.contains("too large"), "{message}");
}

#[tokio::test]
async fn logo_over_the_body_limit_uses_error_envelope() {
    let body = vec![0_u8; 5 * 1024 * 1024];
    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/logo")
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request");

    let (status, json) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    let message = json["error"]["message"].as_str().expect("message");
    assert!(message.contains("too large"), "{message}");
    assert!(message.contains(&(5 * 1024 * 1024).to_string()), "{message}");
}

#[tokio::test]
async fn chat_answers_about_selected_competitor() {
    let app = app();
    let body = serde_json::json!({ "question": "Where are they weak?", "competitor_id": "hootsuite" });
    let (status, json) = send(&app, json_request("POST", "/api/v1/chat", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["answer"]["role"], "model");
    assert_eq!(json["data"]["answer"]["text"], "Stub answer.");
    let transcript = &json["data"]["transcript"];
    assert_eq!(transcript["competitor_id"], "hootsuite");
    let roles: Vec<&str> = transcript["messages"]
        .as_array()
        .expect("messages")
        .iter()
        .filter_map(|m| m["role"].as_str())
        .collect();
    assert_eq!(roles, ["model", "user", "model"]);

    let (_, json) = send(&app, get("/api/v1/chat")).await;
    assert_eq!(json["data"]["messages"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn blank_chat_question_is_rejected() {
    let body = serde_json::json!({ "question": "   " });
    let (status, json) = send(&app(), json_request("POST", "/api/v1/chat", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn status_reports_selection_and_count() {
    let (status, json) = send(&app(), get("/api/v1/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["selected"], "buffer");
    assert_eq!(json["data"]["competitor_count"], 3);
    assert_eq!(json["data"]["auto_refreshing"], false);
    assert_eq!(json["data"]["staleness"]["state"], "idle");
}
