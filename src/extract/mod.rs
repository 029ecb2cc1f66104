//! Content extraction: raw document bytes in, text + image buffers +
//! layout metadata out.
//!
//! Screenshots go through a vision-OCR oracle call; PDFs are read directly
//! with no OCR. Detected screenshot "regions" are descriptive only — the
//! system never crops pixels, so each region resolves to the full original
//! frame for downstream analysis (capped for cost control).

pub mod error;
pub mod ocr;
pub mod pdf;

#[cfg(test)]
mod tests;

pub use error::ExtractionError;
pub use ocr::extract_from_screenshot;
pub use pdf::extract_from_pdf;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum screenshot payload accepted for OCR (1 KB).
pub const MIN_SCREENSHOT_BYTES: usize = 1000;

/// At most this many detected regions are proxied into per-image analysis.
pub const MAX_REGION_PROXIES: usize = 3;

/// A described (not pixel-cropped) sub-area of a screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRegion {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub context: String,
}

/// Layout analysis of the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    #[serde(default = "unknown")]
    pub source_type: String,
    #[serde(default = "unknown")]
    pub platform: String,
    #[serde(default = "unknown")]
    pub layout_type: String,
    #[serde(default)]
    pub content_structure: BTreeMap<String, serde_json::Value>,
}

fn unknown() -> String {
    "unknown".to_string()
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self {
            source_type: "unknown".to_string(),
            platform: "unknown".to_string(),
            layout_type: "unknown".to_string(),
            content_structure: BTreeMap::new(),
        }
    }
}

/// Extraction output consumed by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub image_regions: Vec<ImageRegion>,
    pub layout: LayoutInfo,
}

/// Validates screenshot bytes for OCR: non-empty, above the size floor,
/// and starting with a known image magic header.
pub fn validate_screenshot(bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if bytes.len() < MIN_SCREENSHOT_BYTES {
        return Err(ExtractionError::TooSmall { size: bytes.len() });
    }

    const HEADERS: [&[u8]; 5] = [
        b"\xff\xd8\xff",        // JPEG
        b"\x89PNG\r\n\x1a\n",   // PNG
        b"RIFF",                // WebP container
        b"GIF87a",              // GIF87a
        b"GIF89a",              // GIF89a
    ];

    if HEADERS.iter().any(|h| bytes.starts_with(h)) {
        Ok(())
    } else {
        Err(ExtractionError::UnrecognizedFormat)
    }
}

/// Resolves detected regions to full-frame byte buffers for analysis.
///
/// Precise sub-image cropping is deliberately not attempted; every region
/// receives the entire original screenshot, capped at [`MAX_REGION_PROXIES`].
pub fn proxy_regions(screenshot: &[u8], regions: &[ImageRegion]) -> Vec<Vec<u8>> {
    regions
        .iter()
        .take(MAX_REGION_PROXIES)
        .map(|_| screenshot.to_vec())
        .collect()
}
