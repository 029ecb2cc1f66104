use thiserror::Error;

use crate::oracle::OracleError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("empty input document")]
    Empty,

    #[error("input too small for OCR processing ({size} bytes)")]
    TooSmall { size: usize },

    #[error("input does not start with a recognized image header")]
    UnrecognizedFormat,

    #[error("oracle error during extraction: {0}")]
    Oracle(#[from] OracleError),

    #[error("malformed extraction response: {reason}")]
    MalformedResponse { reason: String },

    #[error("pdf parse error: {0}")]
    Pdf(#[from] lopdf::Error),
}
