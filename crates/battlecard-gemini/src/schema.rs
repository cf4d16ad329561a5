use serde_json::{json, Value};

fn string_list(description: &str) -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" }, "description": description })
}

fn object(properties: &Value) -> Value {
    let required: Vec<&String> = properties
        .as_object()
        .map(|props| props.keys().collect())
        .unwrap_or_default();
    json!({ "type": "OBJECT", "properties": properties, "required": required })
}

/// `responseSchema` for profile generation, in Gemini's OpenAPI subset.
///
/// Mirrors [`crate::GeneratedProfile`]: every section is required.
#[must_use]
pub fn profile_response_schema() -> Value {
    let feature_row = object(&json!({
        "category": { "type": "STRING" },
        "competitorClaim": { "type": "STRING", "description": "What the competitor's marketing promises" },
        "reality": { "type": "STRING", "description": "The weakness or reality check" },
        "counterAdvantage": { "type": "STRING", "description": "How our product solves it better" }
    }));
    let review_count = object(&json!({
        "platform": { "type": "STRING" },
        "count": { "type": "NUMBER" }
    }));
    let critical_review = object(&json!({
        "title": { "type": "STRING", "description": "Short title of the complaint" },
        "comment": { "type": "STRING", "description": "Summary of the negative review" },
        "source": { "type": "STRING", "description": "Source platform, e.g. G2 or Capterra" },
        "date": { "type": "STRING", "description": "Date of review, e.g. 'Jan 2025'" },
        "rating": { "type": "INTEGER", "description": "Star rating: 1, 2 or 3" }
    }));
    let kill_shot = object(&json!({
        "title": { "type": "STRING" },
        "statement": { "type": "STRING" },
        "talkTrack": { "type": "STRING" }
    }));

    object(&json!({
        "title": { "type": "STRING" },
        "summary": object(&json!({
            "verdict": { "type": "STRING" },
            "painPoints": string_list("Top competitor weaknesses"),
            "advantages": string_list("Our advantages addressing those weaknesses")
        })),
        "momentum": object(&json!({
            "marketPosition": { "type": "STRING", "description": "Current market status, e.g. leader, niche, legacy" },
            "recentUpdates": { "type": "STRING", "description": "Recent product changes or strategic shifts" }
        })),
        "platformCoverage": object(&json!({
            "summary": { "type": "STRING" },
            "strengths": string_list("Well-supported platforms")
        })),
        "redFlags": object(&json!({
            "warnings": string_list("Risks for a buyer choosing the competitor"),
            "winSignals": string_list("Prospect signals that favour us")
        })),
        "featureComparison": { "type": "ARRAY", "items": feature_row },
        "pricing": object(&json!({
            "entry": { "type": "STRING" },
            "cons": string_list("Drawbacks of the pricing structure")
        })),
        "reviewAnalysis": object(&json!({
            "competitorConsensus": { "type": "STRING", "description": "General user sentiment on review platforms" },
            "headToHead": { "type": "STRING", "description": "Why users switch to us" }
        })),
        "reviews": { "type": "ARRAY", "items": review_count },
        "criticalReviews": { "type": "ARRAY", "items": critical_review },
        "killShots": { "type": "ARRAY", "items": kill_shot },
        "aiContext": { "type": "STRING", "description": "Condensed digest of everything above for the chat assistant" }
    }))
}
