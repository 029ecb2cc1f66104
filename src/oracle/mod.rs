//! Scoring oracle interface.
//!
//! The oracle is the external vision/text-capable model treated as an opaque
//! function from content to a completion string. Everything that interprets
//! the completion (score extraction, OCR parsing) lives in the callers; this
//! module only moves bytes.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::AzureOracleClient;
pub use error::OracleError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracleClient;

use async_trait::async_trait;
use base64::Engine;

/// One part of a multimodal user message.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    /// Base64-encoded image payload, sent as a `data:` URL with high detail.
    ImageBase64 {
        base64: String,
        media_type: String,
    },
}

impl ContentPart {
    /// Encodes raw image bytes as a JPEG content part.
    ///
    /// Upstream sends every frame as `image/jpeg` regardless of the actual
    /// container format; vision endpoints sniff the real codec themselves.
    pub fn image(bytes: &[u8]) -> Self {
        ContentPart::ImageBase64 {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: "image/jpeg".to_string(),
        }
    }
}

/// A single chat-completion request against a vision-capable deployment.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user_parts: Vec<ContentPart>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user_parts: Vec<ContentPart>) -> Self {
        Self {
            system: system.into(),
            user_parts,
            temperature: 0.0,
            max_tokens: 1500,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Number of image parts attached to the request.
    pub fn image_count(&self) -> usize {
        self.user_parts
            .iter()
            .filter(|p| matches!(p, ContentPart::ImageBase64 { .. }))
            .count()
    }
}

/// Opaque completion backend. Implementations must be cheap to clone or
/// shared behind an `Arc`; one client serves all in-flight jobs.
#[async_trait]
pub trait OracleClient: Send + Sync {
    /// Sends one chat request and returns the raw completion text.
    async fn complete(&self, request: ChatRequest) -> Result<String, OracleError>;
}
