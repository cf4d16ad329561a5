//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Profile generation requests JSON output constrained by
//! [`profile_response_schema`] and validates the reply through
//! [`GeneratedProfile::parse`]. Chat answers are free text and never fail.

use std::time::Duration;

use async_trait::async_trait;
use battlecard_core::{derive_profile_id, AppConfig, BrandContext, CompetitorProfile};
use chrono::Utc;
use reqwest::{Client, Url};

use crate::error::GenerationError;
use crate::generator::{ProfileGenerator, CHAT_EMPTY_ANSWER, CHAT_FALLBACK};
use crate::prompt::{chat_instruction, profile_prompt};
use crate::schema::profile_response_schema;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GeneratedProfile, GenerationConfig,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const TEMPERATURE: f32 = 0.7;
/// Upper bound on how much of an error body is carried into the error.
const MAX_ERROR_BODY_CHARS: usize = 800;

/// Client for the Gemini REST API.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    brand: BrandContext,
}

impl GeminiClient {
    /// Creates a client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        brand: BrandContext,
    ) -> Result<Self, GenerationError> {
        Self::with_base_url(api_key, model, timeout_secs, brand, DEFAULT_BASE_URL)
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`GeminiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        Self::with_base_url(
            &config.gemini_api_key,
            &config.gemini_model,
            config.ai_timeout_secs,
            config.brand.clone(),
            &config.gemini_base_url,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenerationError::InvalidEndpoint`] if `base_url`
    /// and `model` do not form a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        brand: BrandContext,
        base_url: &str,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("battlecard/0.1")
            .build()?;

        let raw = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        let endpoint =
            Url::parse(&raw).map_err(|e| GenerationError::InvalidEndpoint(format!("'{raw}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            brand,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn brand(&self) -> &BrandContext {
        &self.brand
    }

    /// Sends one `generateContent` request and returns the first candidate's
    /// text.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Schema(format!("unreadable Gemini envelope: {e}")))?;
        parsed.first_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl ProfileGenerator for GeminiClient {
    async fn generate_profile(
        &self,
        name: &str,
        url: &str,
        existing_id: Option<&str>,
    ) -> Result<CompetitorProfile, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(profile_prompt(&self.brand, name, url))],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: Some("application/json"),
                response_schema: Some(profile_response_schema()),
            },
        };

        tracing::info!(competitor = %name, url = %url, "requesting competitor profile");
        let text = self.generate_content(&request).await.inspect_err(|e| {
            tracing::warn!(competitor = %name, error = %e, "profile generation failed");
        })?;
        let generated = GeneratedProfile::parse(&text).inspect_err(|e| {
            tracing::warn!(competitor = %name, error = %e, "profile payload rejected");
        })?;

        let completed_at = Utc::now();
        let id = existing_id.map_or_else(|| derive_profile_id(name, completed_at), str::to_string);
        Ok(generated.into_profile(id, name, url, completed_at))
    }

    async fn answer_question(&self, question: &str, context: &str) -> String {
        let request = GenerateContentRequest {
            contents: vec![Content::user(question)],
            system_instruction: Some(Content::instruction(chat_instruction(&self.brand, context))),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: None,
                response_schema: None,
            },
        };

        match self.generate_content(&request).await {
            Ok(answer) => answer,
            Err(GenerationError::EmptyResponse) => CHAT_EMPTY_ANSWER.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "chat answer failed");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
