use chrono::TimeZone;
use serde_json::json;

use super::*;
use crate::analysis::DimensionScore;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 17, 14, 30, 5).single().unwrap()
}

fn dim(score: f64) -> DimensionScore {
    DimensionScore {
        score,
        detail: json!({"overall_score": score}),
    }
}

fn inputs(text: f64, image: f64, consistency: f64) -> ReportInputs {
    ReportInputs {
        mode: AnalysisMode::Screenshot,
        source_name: "capture.png".to_string(),
        text: dim(text),
        image: dim(image),
        consistency: dim(consistency),
        layout: LayoutInfo {
            source_type: "social_media".to_string(),
            platform: "twitter".to_string(),
            layout_type: "post".to_string(),
            content_structure: Default::default(),
        },
    }
}

#[test]
fn test_screenshot_weights_sum_to_one() {
    let w = AnalysisMode::Screenshot.weights();
    assert!((w.text + w.consistency + w.image - 1.0).abs() < 1e-9);
    assert_eq!(w.text, 0.4);
    assert_eq!(w.consistency, 0.35);
    assert_eq!(w.image, 0.25);
}

#[test]
fn test_pdf_weights_sum_to_one() {
    let w = AnalysisMode::Pdf.weights();
    assert!((w.text + w.consistency + w.image - 1.0).abs() < 1e-9);
    assert_eq!(w.text, 0.6);
    assert_eq!(w.image, 0.4);
    assert_eq!(w.consistency, 0.0);
}

#[test]
fn test_weighted_final_score_screenshot() {
    // 80 * 0.4 + 60 * 0.25 + 70 * 0.35 = 71.5
    let score = weighted_final_score(AnalysisMode::Screenshot, 80.0, 60.0, 70.0);
    assert_eq!(score, 71.5);
}

#[test]
fn test_weighted_final_score_pdf_ignores_consistency() {
    // 90 * 0.6 + 50 * 0.4 = 74.0 regardless of the consistency input
    let score = weighted_final_score(AnalysisMode::Pdf, 90.0, 50.0, 0.0);
    assert_eq!(score, 74.0);
    let score = weighted_final_score(AnalysisMode::Pdf, 90.0, 50.0, 100.0);
    assert_eq!(score, 74.0);
}

#[test]
fn test_final_score_rounds_to_one_decimal() {
    // 33.33 * 0.4 + 33.33 * 0.25 + 33.33 * 0.35 = 33.33 -> 33.3
    let score = weighted_final_score(AnalysisMode::Screenshot, 33.33, 33.33, 33.33);
    assert_eq!(score, 33.3);
}

#[test]
fn test_verdict_boundaries_are_inclusive_lower_bounds() {
    let cases = [
        (0.0, Verdict::HighlyUnreliable),
        (19.9, Verdict::HighlyUnreliable),
        (20.0, Verdict::Unreliable),
        (39.9, Verdict::Unreliable),
        (40.0, Verdict::Questionable),
        (59.9, Verdict::Questionable),
        (60.0, Verdict::Credible),
        (79.9, Verdict::Credible),
        (80.0, Verdict::HighlyCredible),
        (100.0, Verdict::HighlyCredible),
    ];

    for (score, expected) in cases {
        assert_eq!(Verdict::from_score(score), expected, "score {}", score);
    }
}

#[test]
fn test_verdict_serializes_as_screaming_snake() {
    let v = serde_json::to_value(Verdict::HighlyCredible).unwrap();
    assert_eq!(v, "HIGHLY_CREDIBLE");
    assert_eq!(Verdict::Questionable.as_str(), "QUESTIONABLE");
    assert_eq!(Verdict::HighlyUnreliable.to_string(), "HIGHLY_UNRELIABLE");
}

#[test]
fn test_report_document_shape() {
    let report = build_report(&inputs(80.0, 60.0, 70.0), fixed_now());

    assert_eq!(report.final_score, 71.5);
    assert_eq!(report.verdict, Verdict::Credible);
    assert_eq!(report.source_name, "capture.png");
    assert!(report.analysis_timestamp.ends_with('Z'));
    assert!(report.analysis_timestamp.starts_with("2025-09-17T14:30:05"));

    assert_eq!(report.input_source["type"], "screenshot");
    assert_eq!(report.input_source["original_filename"], "capture.png");
    assert_eq!(report.input_source["platform"], "twitter");

    assert_eq!(report.score_breakdown["text_score"], 80.0);
    assert_eq!(report.score_breakdown["image_score"], 60.0);
    assert_eq!(report.score_breakdown["consistency_score"], 70.0);
    assert_eq!(report.score_breakdown["weights"]["text_weight"], 0.4);
    assert_eq!(report.score_breakdown["weights"]["consistency_weight"], 0.35);
    assert_eq!(report.score_breakdown["weights"]["image_weight"], 0.25);

    assert!(report.detailed_analysis.get("text_analysis").is_some());
    assert!(report.detailed_analysis.get("image_analysis").is_some());
    assert!(report.detailed_analysis.get("consistency_analysis").is_some());

    assert_eq!(report.metadata["analyzer_version"], "2.0");
    assert_eq!(report.metadata["analysis_method"], "screenshot_ocr_hybrid");
    assert_eq!(report.metadata["layout_analysis"]["source_type"], "social_media");
}

#[test]
fn test_pdf_report_method_tag() {
    let mut i = inputs(50.0, 50.0, 50.0);
    i.mode = AnalysisMode::Pdf;
    let report = build_report(&i, fixed_now());

    assert_eq!(report.metadata["analysis_method"], "pdf_direct_extraction");
    assert_eq!(report.input_source["type"], "pdf");
}

#[test]
fn test_report_blob_name_strips_extension_and_stamps_utc() {
    let name = report_blob_name("capture.png", fixed_now());
    assert_eq!(name, "capture_20250917_143005_report.json");
}

#[test]
fn test_report_blob_name_without_extension() {
    let name = report_blob_name("capture", fixed_now());
    assert_eq!(name, "capture_20250917_143005_report.json");
}
