//! Credlens library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Job`], [`JobStatus`], [`JobTracker`] - Async job state machine
//! - [`Pipeline`], [`PipelineError`] - End-to-end analysis execution
//! - [`Report`], [`Verdict`], [`AnalysisMode`] - Aggregation output
//!
//! ## Analysis
//! - [`Dimension`], [`DimensionScore`] - Independent credibility axes
//! - [`ExtractedContent`] - OCR/PDF extraction output
//!
//! ## External Collaborators
//! - [`OracleClient`], [`AzureOracleClient`] - Vision/text scoring model
//! - [`BlobStore`], [`AzureBlobStore`] - Durable artifact storage
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod jobs;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use analysis::{Dimension, DimensionScore};
pub use config::{Config, ConfigError};
pub use extract::{ExtractedContent, ExtractionError};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use jobs::{Job, JobStatus, JobTracker};
pub use oracle::{AzureOracleClient, ChatRequest, ContentPart, OracleClient, OracleError};
pub use pipeline::{Pipeline, PipelineError};
pub use report::{AnalysisMode, Report, Verdict};
pub use storage::{AzureBlobStore, BlobStore, StorageError};

#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracleClient;
#[cfg(any(test, feature = "mock"))]
pub use storage::MemoryBlobStore;
