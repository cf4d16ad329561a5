//! Wire types for `generateContent` and the validated profile payload.

use battlecard_core::{
    CompetitorProfile, CriticalReview, FeatureComparison, KillShot, Momentum, PlatformCoverage,
    Pricing, RedFlags, ReviewAnalysis, ReviewCount, Summary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GenerationError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub(crate) fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub(crate) fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, `None` if blank.
    pub(crate) fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// Validated profile payload
// ---------------------------------------------------------------------------

/// The profile as the model returns it, before identity fields are applied.
///
/// Every section is required. Numbers arrive as JSON numbers of any kind and
/// are range-checked by [`GeneratedProfile::parse`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProfile {
    #[serde(default)]
    pub title: Option<String>,
    pub summary: Summary,
    pub momentum: Momentum,
    pub platform_coverage: PlatformCoverage,
    pub red_flags: RedFlags,
    pub feature_comparison: Vec<FeatureComparison>,
    pub pricing: Pricing,
    pub review_analysis: ReviewAnalysis,
    pub reviews: Vec<RawReviewCount>,
    pub critical_reviews: Vec<RawCriticalReview>,
    pub kill_shots: Vec<KillShot>,
    pub ai_context: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReviewCount {
    pub platform: String,
    pub count: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCriticalReview {
    pub title: String,
    pub comment: String,
    pub source: String,
    pub date: String,
    pub rating: f64,
}

impl GeneratedProfile {
    /// Parse and validate the model's JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Schema`] if the text is not JSON, a section
    /// is missing or mistyped, a review count is negative or non-finite, or a
    /// rating is not an integer from 1 to 3.
    pub fn parse(text: &str) -> Result<Self, GenerationError> {
        let profile: Self =
            serde_json::from_str(text).map_err(|e| GenerationError::Schema(e.to_string()))?;

        for review in &profile.reviews {
            if !review.count.is_finite() || review.count < 0.0 {
                return Err(GenerationError::Schema(format!(
                    "review count for {} must be a non-negative number, got {}",
                    review.platform, review.count
                )));
            }
        }
        for review in &profile.critical_reviews {
            let valid = review.rating.fract() == 0.0 && (1.0..=3.0).contains(&review.rating);
            if !valid {
                return Err(GenerationError::Schema(format!(
                    "critical review '{}' has rating {}, expected 1, 2 or 3",
                    review.title, review.rating
                )));
            }
        }
        Ok(profile)
    }

    /// Apply identity and timestamp, producing a storable profile.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn into_profile(
        self,
        id: String,
        name: &str,
        url: &str,
        completed_at: DateTime<Utc>,
    ) -> CompetitorProfile {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Analysis: {name}"));

        CompetitorProfile {
            id,
            name: name.to_string(),
            url: url.to_string(),
            last_updated: Some(completed_at),
            title,
            summary: self.summary,
            momentum: self.momentum,
            platform_coverage: self.platform_coverage,
            red_flags: self.red_flags,
            feature_comparison: self.feature_comparison,
            pricing: self.pricing,
            review_analysis: self.review_analysis,
            // Counts and ratings were range-checked in `parse`.
            reviews: self
                .reviews
                .into_iter()
                .map(|r| ReviewCount {
                    platform: r.platform,
                    count: r.count.round() as u64,
                })
                .collect(),
            critical_reviews: self
                .critical_reviews
                .into_iter()
                .map(|r| CriticalReview {
                    title: r.title,
                    comment: r.comment,
                    source: r.source,
                    date: r.date,
                    rating: r.rating as u8,
                })
                .collect(),
            kill_shots: self.kill_shots,
            ai_context: self.ai_context,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
