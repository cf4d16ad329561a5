use battlecard_core::{BrandContext, CompetitorProfile};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::ExportError;

const HEADER: [&str; 4] = ["Section", "Category", "Detail", "Value/Context"];

/// One logical row per field-section pair, every cell quoted.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV writer fails.
pub fn export_csv(profile: &CompetitorProfile, brand: &BrandContext) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in rows(profile, brand) {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}

fn rows(p: &CompetitorProfile, brand: &BrandContext) -> Vec<[String; 4]> {
    let mut rows: Vec<[String; 4]> = Vec::new();
    let mut push = |section: &str, category: &str, detail: String, context: String| {
        rows.push([section.to_string(), category.to_string(), detail, context]);
    };
    let summary = "Executive Summary";

    push(summary, "Title", p.title.clone(), String::new());
    push(summary, "Verdict", p.summary.verdict.clone(), String::new());
    push(summary, "Pricing Reality", p.pricing_reality(), String::new());
    push(summary, "Market Position", p.momentum.market_position.clone(), String::new());
    push(summary, "Platform Overview", p.platform_coverage.summary.clone(), String::new());
    for (i, pain) in p.summary.pain_points.iter().enumerate() {
        push(summary, "Pain Point", format!("{}. {pain}", i + 1), String::new());
    }
    for gap in p.feature_gaps() {
        push(
            summary,
            "Pain Point (Feature Gap)",
            format!("{}: {}", gap.category, gap.reality),
            String::new(),
        );
    }
    for (i, advantage) in p.summary.advantages.iter().enumerate() {
        push(summary, "Advantage", format!("{}. {advantage}", i + 1), String::new());
    }

    let advantage_label = format!("{} Advantage", brand.name);
    for row in &p.feature_comparison {
        push("Feature Check", &row.category, "Competitor Promise".into(), row.competitor_claim.clone());
        push("Feature Check", &row.category, "Reality".into(), row.reality.clone());
        push("Feature Check", &row.category, advantage_label.clone(), row.counter_advantage.clone());
    }

    push("Momentum", "Recent Updates", p.momentum.recent_updates.clone(), String::new());
    for strength in &p.platform_coverage.strengths {
        push("Platform Coverage", "Strength", strength.clone(), String::new());
    }

    for warning in &p.red_flags.warnings {
        push("Red Flags", "Warning", warning.clone(), String::new());
    }
    for signal in &p.red_flags.win_signals {
        push("Red Flags", "Win Signal", signal.clone(), String::new());
    }

    push("Pricing", "Entry Price", p.pricing.entry.clone(), String::new());
    for con in &p.pricing.cons {
        push("Pricing", "Con", con.clone(), String::new());
    }

    push("Reviews", "Consensus", p.review_analysis.competitor_consensus.clone(), String::new());
    push(
        "Reviews",
        &format!("{} Comparison", brand.name),
        p.review_analysis.head_to_head.clone(),
        String::new(),
    );
    for review in &p.reviews {
        push("Reviews", "Review Count", review.platform.clone(), review.count.to_string());
    }
    for review in &p.critical_reviews {
        push(
            "Critical Review",
            &review.title,
            format!("Rating: {}/3", review.rating),
            format!("{} ({}): {}", review.source, review.date, review.comment),
        );
    }

    for (i, shot) in p.kill_shots.iter().enumerate() {
        push(
            &format!("Kill Shot #{}", i + 1),
            &shot.title,
            shot.statement.clone(),
            format!("Track: {}", shot.talk_track),
        );
    }

    rows
}

#[cfg(test)]
mod tests {
    use battlecard_core::FeatureComparison;
    use chrono::Utc;

    use super::*;

    fn hootsuite() -> CompetitorProfile {
        battlecard_store::default_profiles(Utc::now()).unwrap()["hootsuite"].clone()
    }

    fn read_rows(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::Reader::from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn starts_with_quoted_header() {
        let bytes = export_csv(&hootsuite(), &BrandContext::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("\"Section\",\"Category\",\"Detail\",\"Value/Context\"\n"));
    }

    #[test]
    fn every_cell_is_quoted_and_inner_quotes_doubled() {
        let mut profile = hootsuite();
        profile.summary.verdict = r#"They call it "enterprise", users don't"#.to_string();
        let text = String::from_utf8(export_csv(&profile, &BrandContext::default()).unwrap()).unwrap();

        assert!(text.contains(r#""Executive Summary","Verdict","They call it ""enterprise"", users don't","""#));
        for line in text.lines() {
            assert!(line.starts_with('"') && line.ends_with('"'), "unquoted line: {line}");
        }
    }

    #[test]
    fn first_row_carries_the_card_title() {
        let profile = hootsuite();
        let rows = read_rows(&export_csv(&profile, &BrandContext::default()).unwrap());
        assert_eq!(rows[0], ["Executive Summary", "Title", profile.title.as_str(), ""]);
    }

    #[test]
    fn emits_three_rows_per_feature() {
        let profile = hootsuite();
        let rows = read_rows(&export_csv(&profile, &BrandContext::default()).unwrap());
        let feature_rows = rows.iter().filter(|r| r[0] == "Feature Check").count();
        assert_eq!(feature_rows, profile.feature_comparison.len() * 3);
        assert!(rows
            .iter()
            .any(|r| r[1] == "Compliance" && r[2] == "Swat.io Advantage"));
    }

    #[test]
    fn short_reality_is_not_a_feature_gap() {
        let mut profile = hootsuite();
        profile.feature_comparison = vec![
            FeatureComparison {
                category: "API".into(),
                competitor_claim: "Open API".into(),
                reality: "Fine".into(),
                counter_advantage: "Same".into(),
            },
            FeatureComparison {
                category: "Inbox".into(),
                competitor_claim: "Unified".into(),
                reality: "Drops messages".into(),
                counter_advantage: "Stable".into(),
            },
        ];
        let rows = read_rows(&export_csv(&profile, &BrandContext::default()).unwrap());
        let gaps: Vec<&str> = rows
            .iter()
            .filter(|r| r[1] == "Pain Point (Feature Gap)")
            .map(|r| r[2].as_str())
            .collect();
        assert_eq!(gaps, vec!["Inbox: Drops messages"]);
    }

    #[test]
    fn numbers_pain_points_and_kill_shots() {
        let profile = hootsuite();
        let rows = read_rows(&export_csv(&profile, &BrandContext::default()).unwrap());
        assert!(rows.iter().any(|r| r[1] == "Pain Point" && r[2].starts_with("1. ")));
        assert!(rows.iter().any(|r| r[0] == "Kill Shot #2" && r[3].starts_with("Track: ")));
        assert!(rows
            .iter()
            .any(|r| r[0] == "Critical Review" && r[2] == "Rating: 1/3"));
    }
}
