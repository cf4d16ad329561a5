use std::fmt::Write as _;

use battlecard_core::{BrandContext, CompetitorProfile};
use chrono::NaiveDate;

const UTF8_BOM: &str = "\u{feff}";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.5; color: #333; }
h1 { color: #0C3146; font-size: 24px; border-bottom: 2px solid #2B9CDA; padding-bottom: 10px; }
h2 { color: #0C3146; font-size: 18px; margin-top: 25px; background-color: #EEF9FF; padding: 5px 10px; }
h3 { color: #18638B; font-size: 14px; margin-top: 15px; text-transform: uppercase; }
p, li { font-size: 12px; }
table { border-collapse: collapse; width: 100%; margin-top: 10px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; font-size: 12px; }
th { background-color: #f2f2f2; font-weight: bold; }
.box { border: 1px solid #ddd; padding: 15px; margin-bottom: 10px; }
.killshot { background-color: #FFF5F5; border-left: 5px solid #E71D36; padding: 10px; margin-bottom: 10px; }
";

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn list<'a>(out: &mut String, items: impl IntoIterator<Item = &'a String>) {
    out.push_str("<ul>");
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>\n");
}

/// HTML document with Office namespaces, prefixed by a UTF-8 BOM so word
/// processors open it as a `.doc`.
#[must_use]
pub fn export_html(profile: &CompetitorProfile, brand: &BrandContext, generated_on: NaiveDate) -> Vec<u8> {
    let e = escape_html;
    let name = e(&profile.name);
    let brand_name = e(&brand.name);
    let mut out = String::with_capacity(16 * 1024);

    out.push_str(UTF8_BOM);
    out.push_str(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word' \
         xmlns='http://www.w3.org/TR/REC-html40'>\n",
    );
    let _ = write!(
        out,
        "<head><meta charset='utf-8'><title>{brand_name} vs {name}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n"
    );
    let _ = writeln!(out, "<h1>Competitive Analysis: {brand_name} vs {name}</h1>");
    let _ = writeln!(out, "<p><em>{}</em></p>", e(&profile.title));
    let _ = writeln!(
        out,
        "<p><strong>Generated on:</strong> {}</p>",
        generated_on.format("%Y-%m-%d")
    );

    // 1. Executive summary
    out.push_str("<h2>1. Executive Summary</h2>\n<div class=\"box\">\n");
    let _ = writeln!(out, "<h3>Verdict</h3>\n<p>{}</p>", e(&profile.summary.verdict));
    let _ = writeln!(
        out,
        "<p><strong>Pricing Reality:</strong> {}</p>",
        e(&profile.pricing_reality())
    );
    let _ = writeln!(
        out,
        "<p><strong>Market Position:</strong> {}</p>",
        e(&profile.momentum.market_position)
    );
    let _ = writeln!(
        out,
        "<p><strong>Platform Focus:</strong> {}</p>",
        e(&profile.platform_coverage.summary)
    );
    let _ = write!(out, "<h3>Weaknesses ({name})</h3>\n<ul>");
    for pain in &profile.summary.pain_points {
        let _ = write!(out, "<li>{}</li>", e(pain));
    }
    for gap in profile.feature_gaps() {
        let _ = write!(
            out,
            "<li><strong>{}:</strong> {}</li>",
            e(&gap.category),
            e(&gap.reality)
        );
    }
    out.push_str("</ul>\n");
    let _ = writeln!(out, "<h3>{brand_name} Advantages</h3>");
    list(&mut out, &profile.summary.advantages);
    out.push_str("</div>\n");

    // 2. Feature table
    out.push_str("<h2>2. Feature Reality Check</h2>\n<table>\n");
    let _ = writeln!(
        out,
        "<tr><th>Category</th><th>{name} Promise</th><th>Reality</th><th>{brand_name} Advantage</th></tr>"
    );
    for row in &profile.feature_comparison {
        let _ = writeln!(
            out,
            "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td>\
             <td style=\"background-color: #EEF9FF;\"><strong>{}</strong></td></tr>",
            e(&row.category),
            e(&row.competitor_claim),
            e(&row.reality),
            e(&row.counter_advantage)
        );
    }
    out.push_str("</table>\n");

    // 3. Pricing, momentum, platforms
    out.push_str("<h2>3. Pricing &amp; Momentum</h2>\n");
    let _ = writeln!(out, "<p><strong>Entry Price:</strong> {}</p>", e(&profile.pricing.entry));
    out.push_str("<p><strong>Hidden Costs:</strong></p>");
    list(&mut out, &profile.pricing.cons);
    let _ = writeln!(
        out,
        "<p><strong>Recent Updates:</strong> {}</p>",
        e(&profile.momentum.recent_updates)
    );
    out.push_str("<p><strong>Strong Platforms:</strong></p>");
    list(&mut out, &profile.platform_coverage.strengths);

    // 4. Red flags
    out.push_str("<h2>4. Red Flags &amp; Win Signals</h2>\n<h3>Warnings</h3>\n");
    list(&mut out, &profile.red_flags.warnings);
    out.push_str("<h3>Win Signals</h3>\n");
    list(&mut out, &profile.red_flags.win_signals);

    // 5. Reviews
    out.push_str("<h2>5. Review Intelligence</h2>\n");
    let _ = writeln!(
        out,
        "<p><strong>Market Consensus:</strong> {}</p>",
        e(&profile.review_analysis.competitor_consensus)
    );
    let _ = writeln!(
        out,
        "<p><strong>Vs {brand_name}:</strong> {}</p>",
        e(&profile.review_analysis.head_to_head)
    );
    out.push_str("<h3>Review Volume</h3>\n<ul>");
    for review in &profile.reviews {
        let _ = write!(out, "<li>{}: {}</li>", e(&review.platform), review.count);
    }
    let _ = writeln!(out, "<li><strong>Total:</strong> {}</li></ul>", profile.total_review_count());
    out.push_str("<h3>Critical Reviews</h3>\n<ul>");
    for review in &profile.critical_reviews {
        let _ = write!(
            out,
            "<li><strong>{}</strong> ({} stars): &quot;{}&quot; - <em>{}, {}</em></li>",
            e(&review.title),
            review.rating,
            e(&review.comment),
            e(&review.source),
            e(&review.date)
        );
    }
    out.push_str("</ul>\n");

    // 6. Kill shots
    out.push_str("<h2>6. Sales Kill Shots</h2>\n");
    for (i, shot) in profile.kill_shots.iter().enumerate() {
        let _ = writeln!(
            out,
            "<div class=\"killshot\">\n<p><strong>#{}: {}</strong></p>\n\
             <p style=\"font-size: 14px; font-style: italic;\">&quot;{}&quot;</p>\n\
             <p><strong>Talk Track:</strong> {}</p>\n</div>",
            i + 1,
            e(&shot.title),
            e(&shot.statement),
            e(&shot.talk_track)
        );
    }

    out.push_str("</body>\n</html>\n");
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn render(profile: &CompetitorProfile) -> String {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        String::from_utf8(export_html(profile, &BrandContext::default(), date)).unwrap()
    }

    fn buffer() -> CompetitorProfile {
        battlecard_store::default_profiles(Utc::now()).unwrap()["buffer"].clone()
    }

    #[test]
    fn starts_with_bom_and_office_namespaces() {
        let html = render(&buffer());
        assert!(html.starts_with('\u{feff}'));
        assert!(html.contains("xmlns:w='urn:schemas-microsoft-com:office:word'"));
        assert!(html.contains("<title>Swat.io vs Buffer</title>"));
        assert!(html.contains("<strong>Generated on:</strong> 2025-03-14"));
        assert!(html.contains(&format!("<p><em>{}</em></p>", escape_html(&buffer().title))));
    }

    #[test]
    fn escapes_profile_text() {
        let mut profile = buffer();
        profile.name = "Tom & Jerry <Social>".to_string();
        profile.summary.verdict = "Uses \"magic\" & <script>".to_string();
        let html = render(&profile);

        assert!(html.contains("Tom &amp; Jerry &lt;Social&gt;"));
        assert!(html.contains("Uses &quot;magic&quot; &amp; &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn renders_one_table_row_per_feature_and_one_box_per_kill_shot() {
        let profile = buffer();
        let html = render(&profile);
        assert_eq!(html.matches("<tr><td>").count(), profile.feature_comparison.len());
        assert_eq!(html.matches("class=\"killshot\"").count(), profile.kill_shots.len());
    }

    #[test]
    fn escape_html_handles_all_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
