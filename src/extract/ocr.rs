use serde_json::Value;
use tracing::debug;

use crate::oracle::{ChatRequest, ContentPart, OracleClient};

use super::error::ExtractionError;
use super::{ExtractedContent, ImageRegion, LayoutInfo, validate_screenshot};

const OCR_SYSTEM_PROMPT: &str = r#"You are an expert OCR and layout analysis system specializing in processing screenshots of media content including news articles, social media posts, and web content.

Analyze this screenshot and extract:

1. TEXT EXTRACTION (OCR): extract ALL readable text with high accuracy, preserve text hierarchy (headlines, body, captions, metadata), include visible timestamps, usernames, and engagement metrics, maintain logical reading order.

2. IMAGE REGION DETECTION: identify all image areas (photos, graphics, videos, thumbnails), provide descriptions of what each image shows, note image positions relative to text content, distinguish between content images and UI elements.

3. LAYOUT ANALYSIS: determine source type (news website, social media, mobile app, etc.), identify content structure, detect visible metadata.

4. SOURCE DETECTION: identify platform (Twitter/X, Facebook, Instagram, news site, etc.) and mobile vs desktop layout.

CRITICAL: Respond ONLY in valid JSON format. Do not include any explanations, comments, or text outside the JSON object.

The "extracted_text" field MUST be a single string containing all text, not an object or array.

Format:
{
    "extracted_text": "all readable text concatenated in reading order",
    "image_regions": [
        {
            "description": "detailed description of the image content",
            "position": "relative position (top, middle, bottom, left, right)",
            "type": "photo|graphic|video|thumbnail|icon",
            "size": "small|medium|large",
            "context": "relationship to surrounding text"
        }
    ],
    "layout_analysis": {
        "source_type": "news_website|social_media|mobile_app|browser|other",
        "platform": "twitter|facebook|instagram|news_site|unknown",
        "layout_type": "desktop|mobile|tablet",
        "content_structure": {
            "headline": "main headline if present",
            "body_text": "main content text",
            "metadata": "visible dates, sources, authors",
            "engagement": "likes, shares, comments if visible"
        }
    }
}"#;

const OCR_USER_PROMPT: &str = "Extract all text content and analyze the layout of this \
screenshot. Identify any embedded images and their locations. IMPORTANT: Return ONLY valid \
JSON in the exact format specified in the system prompt. The 'extracted_text' field must be \
a single string containing all text concatenated together, NOT an object or array.";

/// Runs vision OCR on a screenshot and parses the structured response.
pub async fn extract_from_screenshot<O: OracleClient + ?Sized>(
    oracle: &O,
    screenshot: &[u8],
) -> Result<ExtractedContent, ExtractionError> {
    validate_screenshot(screenshot)?;

    let request = ChatRequest::new(
        OCR_SYSTEM_PROMPT,
        vec![
            ContentPart::Text(OCR_USER_PROMPT.to_string()),
            ContentPart::image(screenshot),
        ],
    )
    .temperature(0.0)
    .max_tokens(2000);

    let raw = oracle.complete(request).await?;
    parse_ocr_response(&raw)
}

/// Parses the OCR completion. Tolerates the oracle returning a nested
/// object for `extracted_text` by flattening it deterministically.
pub(crate) fn parse_ocr_response(raw: &str) -> Result<ExtractedContent, ExtractionError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        ExtractionError::MalformedResponse {
            reason: format!("not valid JSON: {}", e),
        }
    })?;

    let text = match value.get("extracted_text") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => flatten_extracted_text(map),
        Some(other) => other.to_string(),
        None => {
            return Err(ExtractionError::MalformedResponse {
                reason: "missing extracted_text field".to_string(),
            });
        }
    };

    let image_regions: Vec<ImageRegion> = value
        .get("image_regions")
        .cloned()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .unwrap_or_default();

    let layout = value
        .get("layout_analysis")
        .cloned()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .unwrap_or_default();

    debug!(
        text_len = text.len(),
        regions = image_regions.len(),
        "OCR extraction parsed"
    );

    Ok(ExtractedContent {
        text,
        image_regions,
        layout,
    })
}

/// Flattens a structured `extracted_text` object into one string.
///
/// Leaf strings are concatenated space-separated in fixed section order:
/// metadata, body, caption, branding, other_text.
fn flatten_extracted_text(map: &serde_json::Map<String, Value>) -> String {
    const SECTION_ORDER: [&str; 5] = ["metadata", "body", "caption", "branding", "other_text"];

    let mut parts: Vec<String> = Vec::new();
    for section in SECTION_ORDER {
        if let Some(value) = map.get(section) {
            collect_leaf_strings(value, &mut parts);
        }
    }
    parts.join(" ")
}

fn collect_leaf_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if !s.is_empty() {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_leaf_strings(item, out);
            }
        }
        Value::Object(map) => {
            for (_, item) in map {
                collect_leaf_strings(item, out);
            }
        }
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(_) | Value::Null => {}
    }
}
