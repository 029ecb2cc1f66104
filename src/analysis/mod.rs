//! Dimension scoring via the oracle.
//!
//! The three credibility dimensions (plus the PDF-mode coherence check)
//! share one control flow — build a prompt, call the oracle, run the parse
//! ladder — and differ only in their [`DimensionSpec`]: system prompt,
//! image cap, and temperature. Every entry point here is a
//! guaranteed-bounded operation: transient oracle faults and malformed
//! completions degrade to a worst-case-safe score with diagnostic detail
//! instead of propagating.

mod parse;
mod prompts;

#[cfg(test)]
mod tests;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::oracle::{ChatRequest, ContentPart, OracleClient};

use parse::parse_score_response;

/// Minimum trimmed text length before the text dimension calls the oracle.
pub const MIN_TEXT_LEN: usize = 50;

/// Text prefix length when images accompany the prompt.
pub const TEXT_PREFIX_CHARS: usize = 2000;

/// Minimum bytes for an image buffer to be attached to a request.
pub const MIN_IMAGE_BYTES: usize = 100;

/// One independent scoring axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    TextCredibility,
    ImageAuthenticity,
    Consistency,
    Coherence,
}

/// Per-dimension call parameters; see the module docs.
#[derive(Debug, Clone, Copy)]
pub struct DimensionSpec {
    pub system_prompt: &'static str,
    pub image_cap: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub source_label: &'static str,
    /// Score assumed when a parsed completion lacks `overall_score`.
    pub default_score: f64,
}

impl Dimension {
    pub fn spec(&self) -> DimensionSpec {
        match self {
            Dimension::TextCredibility => DimensionSpec {
                system_prompt: prompts::TEXT_SYSTEM_PROMPT,
                image_cap: 0,
                temperature: 0.3,
                max_tokens: 1500,
                source_label: "oracle text credibility analysis",
                default_score: 0.0,
            },
            Dimension::ImageAuthenticity => DimensionSpec {
                system_prompt: prompts::IMAGE_SYSTEM_PROMPT,
                image_cap: 3,
                temperature: 0.2,
                max_tokens: 1000,
                source_label: "oracle vision authenticity analysis",
                default_score: 50.0,
            },
            Dimension::Consistency => DimensionSpec {
                system_prompt: prompts::CONSISTENCY_SYSTEM_PROMPT,
                image_cap: 2,
                temperature: 0.1,
                max_tokens: 1500,
                source_label: "oracle vision consistency analysis",
                default_score: 50.0,
            },
            Dimension::Coherence => DimensionSpec {
                system_prompt: prompts::COHERENCE_SYSTEM_PROMPT,
                image_cap: 3,
                temperature: 0.2,
                max_tokens: 1500,
                source_label: "oracle vision coherence analysis",
                default_score: 50.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::TextCredibility => "text_credibility",
            Dimension::ImageAuthenticity => "image_authenticity",
            Dimension::Consistency => "consistency",
            Dimension::Coherence => "coherence",
        }
    }
}

/// Bounded score in `[0, 100]` plus its structured explanation.
/// Never mutated after creation.
#[derive(Debug, Clone)]
pub struct DimensionScore {
    pub score: f64,
    pub detail: Value,
}

impl DimensionScore {
    fn new(score: f64, detail: Value) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            detail,
        }
    }
}

/// Scores text credibility. Trimmed text below [`MIN_TEXT_LEN`]
/// short-circuits to 0.0 without reaching the oracle.
pub async fn score_text<O: OracleClient + ?Sized>(oracle: &O, text: &str) -> DimensionScore {
    let trimmed = text.trim();
    if trimmed.len() < MIN_TEXT_LEN {
        return DimensionScore::new(
            0.0,
            json!({
                "error": "Insufficient text content for analysis",
                "text_length": trimmed.len(),
            }),
        );
    }

    let user = format!(
        "Analyze the following news text for credibility:\n\nTEXT TO ANALYZE:\n---\n{}\n---\n\n\
         Please evaluate this text according to the criteria specified in your system prompt \
         and respond in the required JSON format.",
        text
    );

    dispatch(
        oracle,
        Dimension::TextCredibility,
        vec![ContentPart::Text(user)],
    )
    .await
}

/// Scores image authenticity across a set of buffers.
///
/// Each image gets its own oracle call (capped by the dimension spec); the
/// dimension score is the arithmetic mean and the detail aggregates the
/// per-image analyses. An empty set scores neutral 50.0 — absent image
/// evidence is not a failure.
pub async fn score_images<O: OracleClient + ?Sized>(
    oracle: &O,
    images: &[Vec<u8>],
) -> DimensionScore {
    if images.is_empty() {
        return DimensionScore::new(
            50.0,
            json!({
                "warning": "No embedded images found for authenticity analysis",
                "text_only_analysis": true,
                "total_images": 0,
            }),
        );
    }

    let cap = Dimension::ImageAuthenticity.spec().image_cap;
    let mut scores = Vec::new();
    let mut analyses = Vec::new();

    for image in images.iter().take(cap) {
        let result = score_single_image(oracle, image).await;
        scores.push(result.score);
        analyses.push(result.detail);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    debug!(
        images = scores.len(),
        mean_score = mean,
        "Image authenticity dimension scored"
    );

    DimensionScore::new(
        mean,
        json!({
            "average_score": mean,
            "individual_analyses": analyses,
            "total_images": images.len(),
        }),
    )
}

/// Scores text-image consistency (entity/action/context alignment).
pub async fn score_consistency<O: OracleClient + ?Sized>(
    oracle: &O,
    text: &str,
    images: &[Vec<u8>],
) -> DimensionScore {
    score_text_image_pairing(oracle, Dimension::Consistency, text, images).await
}

/// Scores text-image coherence (PDF-mode relevance check).
pub async fn score_coherence<O: OracleClient + ?Sized>(
    oracle: &O,
    text: &str,
    images: &[Vec<u8>],
) -> DimensionScore {
    score_text_image_pairing(oracle, Dimension::Coherence, text, images).await
}

async fn score_single_image<O: OracleClient + ?Sized>(
    oracle: &O,
    image: &[u8],
) -> DimensionScore {
    if image.len() < MIN_IMAGE_BYTES {
        return DimensionScore::new(
            0.0,
            json!({
                "error": "Invalid or insufficient image data",
                "image_size": image.len(),
            }),
        );
    }

    let user = "Analyze this image for authenticity and signs of AI generation or \
                manipulation. Focus on detecting fake news imagery.";

    dispatch(
        oracle,
        Dimension::ImageAuthenticity,
        vec![
            ContentPart::Text(user.to_string()),
            ContentPart::image(image),
        ],
    )
    .await
}

async fn score_text_image_pairing<O: OracleClient + ?Sized>(
    oracle: &O,
    dimension: Dimension,
    text: &str,
    images: &[Vec<u8>],
) -> DimensionScore {
    let trimmed = text.trim();
    if trimmed.len() < MIN_TEXT_LEN {
        return DimensionScore::new(
            0.0,
            json!({
                "error": format!("Insufficient text content for {} analysis", dimension.as_str()),
                "text_length": trimmed.len(),
            }),
        );
    }

    if images.is_empty() {
        return DimensionScore::new(
            50.0,
            json!({
                "warning": format!("No images provided for {} analysis", dimension.as_str()),
                "text_only_analysis": true,
            }),
        );
    }

    let spec = dimension.spec();
    let attached: Vec<&Vec<u8>> = images
        .iter()
        .take(spec.image_cap)
        .filter(|img| img.len() >= MIN_IMAGE_BYTES)
        .collect();

    let user = format!(
        "Analyze the relationship between this text content and the accompanying images \
         according to your system prompt.\n\nTEXT CONTENT:\n{}",
        text_prefix(text, TEXT_PREFIX_CHARS)
    );

    let mut parts = vec![ContentPart::Text(user)];
    for image in &attached {
        parts.push(ContentPart::image(image));
    }

    let mut result = dispatch(oracle, dimension, parts).await;

    if let Value::Object(map) = &mut result.detail {
        map.insert("images_analyzed".to_string(), json!(attached.len()));
        map.insert("total_images_available".to_string(), json!(images.len()));
        map.insert("text_length".to_string(), json!(text.len()));
    }

    result
}

/// The single oracle round-trip shared by every dimension: build the
/// request from the dimension's [`DimensionSpec`], absorb transient
/// faults, run the parse ladder.
async fn dispatch<O: OracleClient + ?Sized>(
    oracle: &O,
    dimension: Dimension,
    user_parts: Vec<ContentPart>,
) -> DimensionScore {
    let spec = dimension.spec();
    let request = ChatRequest::new(spec.system_prompt, user_parts)
        .temperature(spec.temperature)
        .max_tokens(spec.max_tokens);

    match oracle.complete(request).await {
        Ok(raw) => {
            let (score, detail) = parse_score_response(&raw, spec.source_label, spec.default_score);
            DimensionScore::new(score, detail)
        }
        Err(e) => {
            warn!(
                dimension = dimension.as_str(),
                error = %e,
                "Oracle call failed, degrading to zero score"
            );
            DimensionScore::new(
                0.0,
                json!({
                    "error": format!("Oracle API error: {}", e),
                    "type": "api_error",
                }),
            )
        }
    }
}

/// First `max` characters of `text`, char-boundary safe.
fn text_prefix(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
