use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The eight themed views a profile is projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    ExecutiveSummary,
    FeatureCheck,
    PlatformCoverage,
    Pricing,
    Momentum,
    Reviews,
    RedFlags,
    SalesArguments,
}

impl SectionType {
    /// All sections in navigation order.
    pub const ALL: [SectionType; 8] = [
        SectionType::ExecutiveSummary,
        SectionType::FeatureCheck,
        SectionType::PlatformCoverage,
        SectionType::Pricing,
        SectionType::Momentum,
        SectionType::Reviews,
        SectionType::RedFlags,
        SectionType::SalesArguments,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SectionType::ExecutiveSummary => "executive_summary",
            SectionType::FeatureCheck => "feature_check",
            SectionType::PlatformCoverage => "platform_coverage",
            SectionType::Pricing => "pricing",
            SectionType::Momentum => "momentum",
            SectionType::Reviews => "reviews",
            SectionType::RedFlags => "red_flags",
            SectionType::SalesArguments => "sales_arguments",
        }
    }

    /// Display heading for navigation and rendered views.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SectionType::ExecutiveSummary => "Executive Summary",
            SectionType::FeatureCheck => "Feature Reality Check",
            SectionType::PlatformCoverage => "Platform Coverage",
            SectionType::Pricing => "Pricing & Scaling",
            SectionType::Momentum => "Momentum & Development",
            SectionType::Reviews => "Review Intelligence",
            SectionType::RedFlags => "Red Flags & Win Signals",
            SectionType::SalesArguments => "Sales Kill Shots",
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SectionType::ALL
            .into_iter()
            .find(|section| section.key() == normalized)
            .ok_or_else(|| CoreError::UnknownSection(s.to_string()))
    }
}
