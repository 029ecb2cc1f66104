use lopdf::{Document, Object};
use tracing::debug;

use super::error::ExtractionError;

/// Text and embedded raster images pulled from a PDF. No OCR involved.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    /// Page texts concatenated in page order.
    pub text: String,
    /// Raw bytes of every embedded image stream.
    pub images: Vec<Vec<u8>>,
}

/// Extracts per-page text and all embedded image streams from PDF bytes.
pub fn extract_from_pdf(bytes: &[u8]) -> Result<PdfContent, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let doc = Document::load_mem(bytes)?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let text = doc.extract_text(&page_numbers).unwrap_or_default();

    let mut images = Vec::new();
    for (_, object) in doc.objects.iter() {
        if let Object::Stream(stream) = object {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|name| name == b"Image".as_slice())
                .unwrap_or(false);

            if is_image && !stream.content.is_empty() {
                images.push(stream.content.clone());
            }
        }
    }

    debug!(
        pages = page_numbers.len(),
        text_len = text.len(),
        images = images.len(),
        "PDF content extracted"
    );

    Ok(PdfContent { text, images })
}
