use super::parse::parse_score_response;
use super::*;
use crate::oracle::MockOracleClient;
use crate::oracle::mock::ScriptedResponse;

const LONG_TEXT: &str = "Breaking news: the city council voted unanimously on Tuesday to \
approve the new transit budget, citing independent audits and public testimony.";

fn valid_completion(score: f64) -> String {
    format!(
        r#"{{"overall_score": {}, "breakdown": {{"factual_accuracy": {{"score": {}, "reasoning": "ok"}}}}, "red_flags": [], "positive_indicators": ["sources cited"], "verdict": "CREDIBLE"}}"#,
        score, score
    )
}

fn image_bytes() -> Vec<u8> {
    vec![0xffu8; 512]
}

#[tokio::test]
async fn test_short_text_short_circuits_without_oracle_call() {
    let oracle = MockOracleClient::new();

    let result = score_text(&oracle, "   too short   ").await;

    assert_eq!(result.score, 0.0);
    assert!(result.detail.get("error").is_some());
    assert_eq!(result.detail["text_length"], 9);
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_text_scoring_happy_path() {
    let oracle = MockOracleClient::with_default_response(valid_completion(72.0));

    let result = score_text(&oracle, LONG_TEXT).await;

    assert_eq!(result.score, 72.0);
    assert_eq!(result.detail["verdict"], "CREDIBLE");
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn test_empty_image_list_is_neutral_not_failure() {
    let oracle = MockOracleClient::new();

    let result = score_images(&oracle, &[]).await;

    assert_eq!(result.score, 50.0);
    assert_eq!(result.detail["text_only_analysis"], true);
    assert!(result.detail.get("warning").is_some());
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_image_dimension_averages_per_image_scores() {
    let oracle = MockOracleClient::new();
    oracle.push_ok(valid_completion(80.0));
    oracle.push_ok(valid_completion(60.0));

    let images = vec![image_bytes(), image_bytes()];
    let result = score_images(&oracle, &images).await;

    assert_eq!(result.score, 70.0);
    assert_eq!(result.detail["total_images"], 2);
    assert_eq!(
        result.detail["individual_analyses"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn test_image_dimension_caps_oracle_calls_at_three() {
    let oracle = MockOracleClient::with_default_response(valid_completion(50.0));

    let images = vec![image_bytes(); 5];
    let _ = score_images(&oracle, &images).await;

    assert_eq!(oracle.call_count(), 3);
}

#[tokio::test]
async fn test_consistency_without_images_is_neutral() {
    let oracle = MockOracleClient::new();

    let result = score_consistency(&oracle, LONG_TEXT, &[]).await;

    assert_eq!(result.score, 50.0);
    assert_eq!(result.detail["text_only_analysis"], true);
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_consistency_short_text_scores_zero() {
    let oracle = MockOracleClient::new();

    let result = score_consistency(&oracle, "tiny", &[image_bytes()]).await;

    assert_eq!(result.score, 0.0);
    assert!(result.detail.get("error").is_some());
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn test_consistency_attaches_call_metadata() {
    let oracle = MockOracleClient::with_default_response(valid_completion(65.0));

    let images = vec![image_bytes(); 4];
    let result = score_consistency(&oracle, LONG_TEXT, &images).await;

    assert_eq!(result.score, 65.0);
    // Consistency caps at 2 images regardless of how many are available.
    assert_eq!(result.detail["images_analyzed"], 2);
    assert_eq!(result.detail["total_images_available"], 4);
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn test_oracle_fault_degrades_to_zero_api_error() {
    let oracle = MockOracleClient::new();
    oracle.push_response(ScriptedResponse::ApiError {
        status: 429,
        message: "rate limited".to_string(),
    });

    let result = score_text(&oracle, LONG_TEXT).await;

    assert_eq!(result.score, 0.0);
    assert_eq!(result.detail["type"], "api_error");
}

#[tokio::test]
async fn test_oracle_timeout_degrades_to_zero_api_error() {
    let oracle = MockOracleClient::new();
    oracle.push_response(ScriptedResponse::Timeout);

    let result = score_text(&oracle, LONG_TEXT).await;

    assert_eq!(result.score, 0.0);
    assert_eq!(result.detail["type"], "api_error");
}

#[test]
fn test_parse_ladder_strict_json() {
    let (score, detail) = parse_score_response(&valid_completion(88.0), "test source", 0.0);

    assert_eq!(score, 88.0);
    assert_eq!(detail["source"], "test source");
    assert_eq!(detail["verdict"], "CREDIBLE");
}

#[test]
fn test_parse_ladder_missing_score_uses_dimension_default() {
    let raw = r#"{"breakdown": {}, "verdict": "QUESTIONABLE"}"#;

    let (score, _) = parse_score_response(raw, "s", 0.0);
    assert_eq!(score, 0.0);

    let (score, _) = parse_score_response(raw, "s", 50.0);
    assert_eq!(score, 50.0);
}

#[test]
fn test_parse_ladder_regex_recovery() {
    let raw = "The analysis is as follows. Overall_score: 37 because the claims lack sourcing.";

    let (score, detail) = parse_score_response(raw, "s", 0.0);

    assert_eq!(score, 37.0);
    assert!(detail.get("error").is_some());
    assert_eq!(detail["extracted_score"], 37.0);
}

#[test]
fn test_parse_ladder_no_pattern_falls_back_to_neutral() {
    let raw = "I could not produce a structured answer for this input.";

    let (score, detail) = parse_score_response(raw, "s", 0.0);

    assert_eq!(score, 50.0);
    assert!(detail.get("error").is_some());
}

#[test]
fn test_parse_ladder_blank_completion_is_zero() {
    let (score, detail) = parse_score_response("   ", "s", 50.0);

    assert_eq!(score, 0.0);
    assert!(detail.get("error").is_some());
}

#[test]
fn test_parse_ladder_clamps_out_of_range_scores() {
    let raw = r#"{"overall_score": 250}"#;
    let (score, _) = parse_score_response(raw, "s", 0.0);
    assert_eq!(score, 100.0);
}

#[test]
fn test_parse_ladder_truncates_raw_response_diagnostics() {
    let raw = "x".repeat(2000);
    let (_, detail) = parse_score_response(&raw, "s", 0.0);
    assert_eq!(detail["raw_response"].as_str().map(str::len), Some(500));
}

#[test]
fn test_dimension_specs_match_cost_policy() {
    assert_eq!(Dimension::TextCredibility.spec().image_cap, 0);
    assert_eq!(Dimension::ImageAuthenticity.spec().image_cap, 3);
    assert_eq!(Dimension::Consistency.spec().image_cap, 2);
    assert_eq!(Dimension::Coherence.spec().image_cap, 3);
}
