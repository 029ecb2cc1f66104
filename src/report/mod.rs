//! Score aggregation and report assembly.
//!
//! Folds the independent dimension scores into one weighted final score and
//! a 5-level verdict, then assembles the immutable report document that is
//! attached to the job and persisted to blob storage.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::analysis::DimensionScore;
use crate::extract::LayoutInfo;

/// Report schema version tag.
pub const ANALYZER_VERSION: &str = "2.0";

/// Input mode selecting the active dimension set and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Screenshot flow: text 0.4, consistency 0.35, image 0.25.
    Screenshot,
    /// PDF flow: text 0.6, image 0.4; coherence reported as detail only.
    Pdf,
}

impl AnalysisMode {
    pub fn weights(&self) -> Weights {
        match self {
            AnalysisMode::Screenshot => Weights {
                text: 0.4,
                consistency: 0.35,
                image: 0.25,
            },
            AnalysisMode::Pdf => Weights {
                text: 0.6,
                consistency: 0.0,
                image: 0.4,
            },
        }
    }

    pub fn analysis_method(&self) -> &'static str {
        match self {
            AnalysisMode::Screenshot => "screenshot_ocr_hybrid",
            AnalysisMode::Pdf => "pdf_direct_extraction",
        }
    }

    pub fn source_kind(&self) -> &'static str {
        match self {
            AnalysisMode::Screenshot => "screenshot",
            AnalysisMode::Pdf => "pdf",
        }
    }
}

/// Dimension weights for a mode. Active weights always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub text: f64,
    pub consistency: f64,
    pub image: f64,
}

/// Final 5-level verdict, mapped from the weighted score with inclusive
/// lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "HIGHLY_CREDIBLE")]
    HighlyCredible,
    #[serde(rename = "CREDIBLE")]
    Credible,
    #[serde(rename = "QUESTIONABLE")]
    Questionable,
    #[serde(rename = "UNRELIABLE")]
    Unreliable,
    #[serde(rename = "HIGHLY_UNRELIABLE")]
    HighlyUnreliable,
}

impl Verdict {
    /// Maps a final score to its verdict. Boundaries are inclusive lower
    /// bounds: 80, 60, 40, 20.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Verdict::HighlyCredible
        } else if score >= 60.0 {
            Verdict::Credible
        } else if score >= 40.0 {
            Verdict::Questionable
        } else if score >= 20.0 {
            Verdict::Unreliable
        } else {
            Verdict::HighlyUnreliable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::HighlyCredible => "HIGHLY_CREDIBLE",
            Verdict::Credible => "CREDIBLE",
            Verdict::Questionable => "QUESTIONABLE",
            Verdict::Unreliable => "UNRELIABLE",
            Verdict::HighlyUnreliable => "HIGHLY_UNRELIABLE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs to report assembly: the three dimension results plus provenance.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub mode: AnalysisMode,
    pub source_name: String,
    pub text: DimensionScore,
    pub image: DimensionScore,
    /// Consistency (screenshot mode) or coherence (PDF mode, detail-only).
    pub consistency: DimensionScore,
    pub layout: LayoutInfo,
}

/// The final structured output. Created once on full pipeline success;
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub source_name: String,
    pub analysis_timestamp: String,
    pub final_score: f64,
    pub verdict: Verdict,
    pub input_source: Value,
    pub score_breakdown: Value,
    pub detailed_analysis: Value,
    pub metadata: Value,
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes the weighted final score for a mode, rounded to one decimal.
pub fn weighted_final_score(
    mode: AnalysisMode,
    text_score: f64,
    image_score: f64,
    consistency_score: f64,
) -> f64 {
    let w = mode.weights();
    round1(text_score * w.text + image_score * w.image + consistency_score * w.consistency)
}

/// Assembles the report from dimension results at `now`.
pub fn build_report(inputs: &ReportInputs, now: DateTime<Utc>) -> Report {
    let w = inputs.mode.weights();
    let final_score = weighted_final_score(
        inputs.mode,
        inputs.text.score,
        inputs.image.score,
        inputs.consistency.score,
    );
    let verdict = Verdict::from_score(final_score);

    Report {
        source_name: inputs.source_name.clone(),
        analysis_timestamp: format!("{}Z", now.format("%Y-%m-%dT%H:%M:%S%.6f")),
        final_score,
        verdict,
        input_source: json!({
            "type": inputs.mode.source_kind(),
            "original_filename": inputs.source_name,
            "source_type": inputs.layout.source_type,
            "platform": inputs.layout.platform,
            "layout_type": inputs.layout.layout_type,
        }),
        score_breakdown: json!({
            "text_score": round1(inputs.text.score),
            "image_score": round1(inputs.image.score),
            "consistency_score": round1(inputs.consistency.score),
            "weights": {
                "text_weight": w.text,
                "consistency_weight": w.consistency,
                "image_weight": w.image,
            },
        }),
        detailed_analysis: json!({
            "text_analysis": inputs.text.detail,
            "image_analysis": inputs.image.detail,
            "consistency_analysis": inputs.consistency.detail,
        }),
        metadata: json!({
            "analyzer_version": ANALYZER_VERSION,
            "analysis_method": inputs.mode.analysis_method(),
            "layout_analysis": inputs.layout,
        }),
    }
}

/// Derives the deterministic blob name for a persisted report:
/// `{base_name}_{YYYYMMDD_HHMMSS}_report.json` (UTC).
pub fn report_blob_name(source_name: &str, now: DateTime<Utc>) -> String {
    let base = source_name
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(source_name);
    format!("{}_{}_report.json", base, now.format("%Y%m%d_%H%M%S"))
}
