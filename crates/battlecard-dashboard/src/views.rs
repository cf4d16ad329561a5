//! Stateless projections of a profile into the eight dashboard sections.

use std::fmt::Write as _;

use battlecard_core::{
    BrandContext, CompetitorProfile, CriticalReview, FeatureComparison, ReviewCount, SectionType,
};
use serde::Serialize;

/// How many feature gaps the executive summary lists.
const SUMMARY_FEATURE_GAPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureGap {
    pub category: String,
    pub reality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedKillShot {
    pub number: usize,
    pub title: String,
    pub statement: String,
    pub talk_track: String,
}

/// One rendered section, tagged by `section` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum SectionView {
    ExecutiveSummary {
        competitor: String,
        brand: String,
        verdict: String,
        pricing_reality: String,
        pain_points: Vec<String>,
        feature_gaps: Vec<FeatureGap>,
        advantages: Vec<String>,
    },
    FeatureCheck {
        competitor: String,
        brand: String,
        rows: Vec<FeatureComparison>,
    },
    PlatformCoverage {
        summary: String,
        strengths: Vec<String>,
    },
    Pricing {
        entry: String,
        cons: Vec<String>,
    },
    Momentum {
        market_position: String,
        recent_updates: String,
    },
    Reviews {
        brand: String,
        consensus: String,
        head_to_head: String,
        counts: Vec<ReviewCount>,
        total: u64,
        critical_reviews: Vec<CriticalReview>,
    },
    RedFlags {
        warnings: Vec<String>,
        win_signals: Vec<String>,
    },
    SalesArguments {
        kill_shots: Vec<NumberedKillShot>,
    },
}

impl SectionView {
    #[must_use]
    pub fn section(&self) -> SectionType {
        match self {
            Self::ExecutiveSummary { .. } => SectionType::ExecutiveSummary,
            Self::FeatureCheck { .. } => SectionType::FeatureCheck,
            Self::PlatformCoverage { .. } => SectionType::PlatformCoverage,
            Self::Pricing { .. } => SectionType::Pricing,
            Self::Momentum { .. } => SectionType::Momentum,
            Self::Reviews { .. } => SectionType::Reviews,
            Self::RedFlags { .. } => SectionType::RedFlags,
            Self::SalesArguments { .. } => SectionType::SalesArguments,
        }
    }
}

#[must_use]
pub fn render_section(
    profile: &CompetitorProfile,
    section: SectionType,
    brand: &BrandContext,
) -> SectionView {
    match section {
        SectionType::ExecutiveSummary => SectionView::ExecutiveSummary {
            competitor: profile.name.clone(),
            brand: brand.name.clone(),
            verdict: profile.summary.verdict.clone(),
            pricing_reality: profile.pricing_reality(),
            pain_points: profile.summary.pain_points.clone(),
            feature_gaps: profile
                .feature_gaps()
                .take(SUMMARY_FEATURE_GAPS)
                .map(|f| FeatureGap {
                    category: f.category.clone(),
                    reality: f.reality.clone(),
                })
                .collect(),
            advantages: profile.summary.advantages.clone(),
        },
        SectionType::FeatureCheck => SectionView::FeatureCheck {
            competitor: profile.name.clone(),
            brand: brand.name.clone(),
            rows: profile.feature_comparison.clone(),
        },
        SectionType::PlatformCoverage => SectionView::PlatformCoverage {
            summary: profile.platform_coverage.summary.clone(),
            strengths: profile.platform_coverage.strengths.clone(),
        },
        SectionType::Pricing => SectionView::Pricing {
            entry: profile.pricing.entry.clone(),
            cons: profile.pricing.cons.clone(),
        },
        SectionType::Momentum => SectionView::Momentum {
            market_position: profile.momentum.market_position.clone(),
            recent_updates: profile.momentum.recent_updates.clone(),
        },
        SectionType::Reviews => SectionView::Reviews {
            brand: brand.name.clone(),
            consensus: profile.review_analysis.competitor_consensus.clone(),
            head_to_head: profile.review_analysis.head_to_head.clone(),
            counts: profile.reviews.clone(),
            total: profile.total_review_count(),
            critical_reviews: profile.critical_reviews.clone(),
        },
        SectionType::RedFlags => SectionView::RedFlags {
            warnings: profile.red_flags.warnings.clone(),
            win_signals: profile.red_flags.win_signals.clone(),
        },
        SectionType::SalesArguments => SectionView::SalesArguments {
            kill_shots: profile
                .kill_shots
                .iter()
                .enumerate()
                .map(|(i, shot)| NumberedKillShot {
                    number: i + 1,
                    title: shot.title.clone(),
                    statement: shot.statement.clone(),
                    talk_track: shot.talk_track.clone(),
                })
                .collect(),
        },
    }
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// Plain-text rendering for terminals.
#[must_use]
pub fn render_text(view: &SectionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.section().title());

    match view {
        SectionView::ExecutiveSummary {
            competitor,
            brand,
            verdict,
            pricing_reality,
            pain_points,
            feature_gaps,
            advantages,
        } => {
            let _ = writeln!(out, "Verdict: {verdict}");
            let _ = writeln!(out, "Pricing reality: {pricing_reality}");
            let _ = writeln!(out, "Weaknesses ({competitor}):");
            bullets(&mut out, pain_points);
            for gap in feature_gaps {
                let _ = writeln!(out, "  - {}: {}", gap.category, gap.reality);
            }
            let _ = writeln!(out, "{brand} advantages:");
            bullets(&mut out, advantages);
        }
        SectionView::FeatureCheck {
            competitor,
            brand,
            rows,
        } => {
            for row in rows {
                let _ = writeln!(out, "[{}]", row.category);
                let _ = writeln!(out, "  {competitor} promise: {}", row.competitor_claim);
                let _ = writeln!(out, "  Reality: {}", row.reality);
                let _ = writeln!(out, "  {brand} advantage: {}", row.counter_advantage);
            }
        }
        SectionView::PlatformCoverage { summary, strengths } => {
            let _ = writeln!(out, "{summary}");
            let _ = writeln!(out, "Strong platforms:");
            bullets(&mut out, strengths);
        }
        SectionView::Pricing { entry, cons } => {
            let _ = writeln!(out, "Entry price: {entry}");
            let _ = writeln!(out, "Hidden costs:");
            bullets(&mut out, cons);
        }
        SectionView::Momentum {
            market_position,
            recent_updates,
        } => {
            let _ = writeln!(out, "Market position: {market_position}");
            let _ = writeln!(out, "Recent updates: {recent_updates}");
        }
        SectionView::Reviews {
            brand,
            consensus,
            head_to_head,
            counts,
            total,
            critical_reviews,
        } => {
            let _ = writeln!(out, "Consensus: {consensus}");
            let _ = writeln!(out, "Vs {brand}: {head_to_head}");
            let _ = writeln!(out, "Review volume ({total} total):");
            for count in counts {
                let _ = writeln!(out, "  - {}: {}", count.platform, count.count);
            }
            let _ = writeln!(out, "Critical reviews:");
            for review in critical_reviews {
                let _ = writeln!(
                    out,
                    "  - {} ({}/3, {} {}): \"{}\"",
                    review.title, review.rating, review.source, review.date, review.comment
                );
            }
        }
        SectionView::RedFlags {
            warnings,
            win_signals,
        } => {
            let _ = writeln!(out, "Warnings:");
            bullets(&mut out, warnings);
            let _ = writeln!(out, "Win signals:");
            bullets(&mut out, win_signals);
        }
        SectionView::SalesArguments { kill_shots } => {
            for shot in kill_shots {
                let _ = writeln!(out, "#{} {}", shot.number, shot.title);
                let _ = writeln!(out, "  \"{}\"", shot.statement);
                let _ = writeln!(out, "  Talk track: {}", shot.talk_track);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn hootsuite() -> CompetitorProfile {
        battlecard_store::default_profiles(Utc::now()).unwrap()["hootsuite"].clone()
    }

    #[test]
    fn every_section_renders_its_own_variant() {
        let profile = hootsuite();
        for section in SectionType::ALL {
            let view = render_section(&profile, section, &BrandContext::default());
            assert_eq!(view.section(), section);
            assert!(render_text(&view).starts_with(&format!("== {} ==", section.title())));
        }
    }

    #[test]
    fn executive_summary_lists_at_most_two_feature_gaps() {
        let mut profile = hootsuite();
        profile.feature_comparison = (0..4)
            .map(|i| FeatureComparison {
                category: format!("Area {i}"),
                competitor_claim: "Claim".into(),
                reality: "A real gap".into(),
                counter_advantage: "Ours".into(),
            })
            .collect();
        let view = render_section(&profile, SectionType::ExecutiveSummary, &BrandContext::default());
        let SectionView::ExecutiveSummary {
            feature_gaps,
            pricing_reality,
            ..
        } = view
        else {
            panic!("wrong variant");
        };
        assert_eq!(feature_gaps.len(), 2);
        assert_eq!(feature_gaps[0].category, "Area 0");
        assert!(pricing_reality.starts_with(&format!("Starts at {}.", profile.pricing.entry)));
    }

    #[test]
    fn kill_shots_are_numbered_from_one() {
        let profile = hootsuite();
        let view = render_section(&profile, SectionType::SalesArguments, &BrandContext::default());
        let SectionView::SalesArguments { kill_shots } = view else {
            panic!("wrong variant");
        };
        let numbers: Vec<usize> = kill_shots.iter().map(|k| k.number).collect();
        assert_eq!(numbers, (1..=profile.kill_shots.len()).collect::<Vec<_>>());
    }

    #[test]
    fn reviews_carry_total() {
        let profile = hootsuite();
        let view = render_section(&profile, SectionType::Reviews, &BrandContext::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["section"], "reviews");
        assert_eq!(json["total"], profile.total_review_count());
        assert!(render_text(&view).contains(&format!("({} total)", profile.total_review_count())));
    }
}
