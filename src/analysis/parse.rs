use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};
use tracing::debug;

/// Key-like `overall_score` pattern used when strict JSON parsing fails.
static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)overall[_\s]*score["\s:]*(\d+)"#).expect("score pattern compiles")
});

/// Extracts `(score, detail)` from a raw oracle completion.
///
/// Graceful-degradation ladder, in order:
/// 1. strict JSON parse — `overall_score` (falling back to `default_score`
///    when the key is absent), full parsed object kept as detail;
/// 2. regex scan for an `overall_score`-like pattern, recovering a numeric
///    value with a diagnostic detail (50.0 when nothing matches);
/// 3. empty/blank completion — 0.0 with an explicit error detail.
///
/// Never panics and never propagates; a malformed completion always
/// degrades to a bounded score plus diagnostics.
pub(crate) fn parse_score_response(raw: &str, source: &str, default_score: f64) -> (f64, Value) {
    if raw.trim().is_empty() {
        return (
            0.0,
            json!({
                "error": "Complete parsing failure",
                "raw_response": truncate(raw, 200),
                "source": format!("{} (critical error)", source),
            }),
        );
    }

    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(mut map)) => {
            let score = map
                .get("overall_score")
                .and_then(Value::as_f64)
                .unwrap_or(default_score)
                .clamp(0.0, 100.0);

            map.insert("overall_score".to_string(), json!(score));
            map.insert("source".to_string(), json!(source));
            (score, Value::Object(map))
        }
        Ok(_) | Err(_) => {
            debug!(source, "Strict JSON parse failed, attempting score recovery");

            let recovered = SCORE_PATTERN
                .captures(raw)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok());

            let score = recovered.unwrap_or(50.0).clamp(0.0, 100.0);
            (
                score,
                json!({
                    "error": "Failed to parse structured response",
                    "raw_response": truncate(raw, 500),
                    "extracted_score": score,
                    "source": format!("{} (parsing error)", source),
                }),
            )
        }
    }
}

/// First `max` characters of a completion, for diagnostic payloads.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
