use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profiles keyed by id. Iteration is lexicographic by id, which is also the
/// fallback order used when the selected profile disappears.
pub type ProfileMap = BTreeMap<String, CompetitorProfile>;

/// Minimum `reality` length for a feature row to count as a competitor gap.
const FEATURE_GAP_MIN_CHARS: usize = 5;

/// The structured competitive analysis for one competitor.
///
/// This is the unit of storage and of AI generation. Refreshes replace the
/// whole value; there are no partial patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorProfile {
    pub id: String,
    pub name: String,
    /// Empty when unknown; a profile without a URL cannot be refreshed.
    #[serde(default)]
    pub url: String,
    /// Completion time of the last successful generation, stored as epoch
    /// milliseconds. Missing or zero means "never".
    #[serde(default, with = "epoch_millis")]
    pub last_updated: Option<DateTime<Utc>>,
    pub title: String,
    pub summary: Summary,
    pub momentum: Momentum,
    pub platform_coverage: PlatformCoverage,
    pub red_flags: RedFlags,
    pub feature_comparison: Vec<FeatureComparison>,
    pub pricing: Pricing,
    pub review_analysis: ReviewAnalysis,
    pub reviews: Vec<ReviewCount>,
    pub critical_reviews: Vec<CriticalReview>,
    pub kill_shots: Vec<KillShot>,
    pub ai_context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub verdict: String,
    pub pain_points: Vec<String>,
    pub advantages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Momentum {
    pub market_position: String,
    pub recent_updates: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCoverage {
    pub summary: String,
    /// Networks the competitor supports well.
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlags {
    /// Risks for a buyer choosing the competitor.
    pub warnings: Vec<String>,
    /// Prospect signals that favour our brand.
    pub win_signals: Vec<String>,
}

/// One row of the feature reality check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureComparison {
    pub category: String,
    /// What the competitor's marketing promises.
    pub competitor_claim: String,
    pub reality: String,
    /// How our brand answers the gap.
    pub counter_advantage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub entry: String,
    /// Cost caveats: per-seat pricing, paid add-ons, and so on.
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnalysis {
    pub competitor_consensus: String,
    pub head_to_head: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCount {
    pub platform: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalReview {
    pub title: String,
    pub comment: String,
    pub source: String,
    pub date: String,
    /// Star rating, 1 to 3.
    pub rating: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillShot {
    pub title: String,
    pub statement: String,
    pub talk_track: String,
}

impl CompetitorProfile {
    /// Returns `true` when the profile has no usable generation timestamp.
    #[must_use]
    pub fn is_never_updated(&self) -> bool {
        self.last_updated.is_none_or(|t| t.timestamp_millis() <= 0)
    }

    /// Returns `true` if the profile carries a URL it can be regenerated from.
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Feature rows whose reality check is substantial enough to present as a
    /// competitor weakness.
    pub fn feature_gaps(&self) -> impl Iterator<Item = &FeatureComparison> {
        self.feature_comparison
            .iter()
            .filter(|f| f.reality.chars().count() > FEATURE_GAP_MIN_CHARS)
    }

    /// Sum of review counts across all platforms.
    #[must_use]
    pub fn total_review_count(&self) -> u64 {
        self.reviews.iter().map(|r| r.count).sum()
    }

    /// "Starts at X. A. B": entry price plus the first two cost caveats.
    #[must_use]
    pub fn pricing_reality(&self) -> String {
        let cons: Vec<&str> = self.pricing.cons.iter().take(2).map(String::as_str).collect();
        if cons.is_empty() {
            format!("Starts at {}.", self.pricing.entry)
        } else {
            format!("Starts at {}. {}.", self.pricing.entry, cons.join(". "))
        }
    }
}

/// Derive a fresh profile id from the competitor name and creation time.
///
/// Lowercases the name and joins whitespace-separated words with `_`, then
/// appends the creation time in epoch milliseconds, e.g.
/// `"Sprout Social"` → `"sprout_social_1735689600000"`.
#[must_use]
pub fn derive_profile_id(name: &str, at: DateTime<Utc>) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    format!("{slug}_{}", at.timestamp_millis())
}

/// Filename-safe token: whitespace runs become `_`; anything other than
/// alphanumerics, `-` and `_` is dropped.
#[must_use]
pub fn file_token(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Serde adapter for `Option<DateTime<Utc>>` as epoch milliseconds.
///
/// Accepts integers, floats (JavaScript `Date.now()` values written by other
/// clients) and `null`. Zero and negative values read back as `None`.
mod epoch_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Int(i64),
        Float(f64),
    }

    #[allow(clippy::ref_option)] // serde `with` passes `&Option<T>`
    pub(super) fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_i64(ts.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[allow(clippy::cast_possible_truncation)]
        let millis = match Option::<Millis>::deserialize(deserializer)? {
            None => return Ok(None),
            Some(Millis::Int(ms)) => ms,
            Some(Millis::Float(ms)) if ms.is_finite() => ms as i64,
            Some(Millis::Float(_)) => return Ok(None),
        };
        if millis <= 0 {
            return Ok(None);
        }
        Ok(DateTime::from_timestamp_millis(millis))
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
