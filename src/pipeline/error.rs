use thiserror::Error;

use crate::extract::ExtractionError;
use crate::storage::StorageError;

/// Fatal pipeline failure. The display string is written verbatim into the
/// job's terminal error state, so each variant carries its user-facing
/// category prefix.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ExtractionError> for PipelineError {
    fn from(e: ExtractionError) -> Self {
        match e {
            // Input-shape failures are the uploader's fault.
            ExtractionError::Empty
            | ExtractionError::TooSmall { .. }
            | ExtractionError::UnrecognizedFormat => PipelineError::Validation(e.to_string()),
            other => PipelineError::Processing(other.to_string()),
        }
    }
}
