//! Job execution pipeline.
//!
//! Drives one uploaded document through the fixed checkpoint sequence:
//! raw upload, content extraction, the three dimension scores, report
//! assembly and persistence. Progress follows the fixed
//! [`PROGRESS_CHECKPOINTS`](crate::jobs::PROGRESS_CHECKPOINTS) ramp so
//! clients see deterministic percentages. Any fatal error lands the job in
//! the terminal `error` state with a categorized message; the staged temp
//! file is removed on every exit path.

pub mod error;


pub use error::PipelineError;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::{self, DimensionScore};
use crate::extract::{self, ExtractedContent, LayoutInfo};
use crate::jobs::{JobTracker, PROGRESS_CHECKPOINTS};
use crate::oracle::OracleClient;
use crate::report::{AnalysisMode, ReportInputs, build_report, report_blob_name};
use crate::storage::BlobStore;

/// Minimum trimmed length of extracted text before analysis proceeds.
pub const MIN_EXTRACTED_TEXT_LEN: usize = 20;

/// One pipeline instance serves all jobs; per-job state lives in the
/// tracker.
pub struct Pipeline<O: OracleClient + ?Sized, S: BlobStore + ?Sized> {
    tracker: Arc<JobTracker>,
    oracle: Arc<O>,
    store: Arc<S>,
    upload_container: String,
    report_container: String,
}

impl<O: OracleClient + ?Sized, S: BlobStore + ?Sized> Pipeline<O, S> {
    pub fn new(
        tracker: Arc<JobTracker>,
        oracle: Arc<O>,
        store: Arc<S>,
        upload_container: impl Into<String>,
        report_container: impl Into<String>,
    ) -> Self {
        Self {
            tracker,
            oracle,
            store,
            upload_container: upload_container.into(),
            report_container: report_container.into(),
        }
    }

    /// Runs a job to a terminal state. Never returns an error; failures are
    /// recorded on the job. The staged temp file is deleted regardless of
    /// outcome.
    pub async fn run(&self, job_id: &str, filename: &str, mode: AnalysisMode) {
        let outcome = self.execute(job_id, filename, mode).await;

        match outcome {
            Ok(results) => {
                info!(job_id, filename, "Analysis pipeline completed");
                self.tracker.set_completed(job_id, results);
            }
            Err(e) => {
                warn!(job_id, filename, error = %e, "Analysis pipeline failed");
                self.tracker.set_error(job_id, &e.to_string());
            }
        }

        if let Some(path) = self.tracker.take_temp_path(job_id) {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(job_id, path = %path.display(), error = %e, "Temp file cleanup failed");
            }
        }
    }

    async fn execute(
        &self,
        job_id: &str,
        filename: &str,
        mode: AnalysisMode,
    ) -> Result<Value, PipelineError> {
        self.checkpoint(job_id, 0, "Starting analysis");

        let bytes = self.read_staged_file(job_id).await?;

        self.checkpoint(job_id, 1, "Uploading source file");
        self.upload_raw(filename, &bytes).await?;

        self.checkpoint(job_id, 2, "Extracting text content");
        let (content, images) = self.extract(&bytes, mode).await?;

        let trimmed = content.text.trim();
        if trimmed.len() < MIN_EXTRACTED_TEXT_LEN {
            return Err(PipelineError::Validation(format!(
                "Insufficient text extracted for analysis ({} chars)",
                trimmed.len()
            )));
        }

        self.checkpoint(job_id, 3, "Preparing image evidence");

        self.checkpoint(job_id, 4, "Analyzing text credibility");
        let text_score = analysis::score_text(self.oracle.as_ref(), &content.text).await;

        self.checkpoint(job_id, 5, "Analyzing image authenticity");
        let image_score = analysis::score_images(self.oracle.as_ref(), &images).await;

        self.checkpoint(job_id, 6, "Analyzing text-image consistency");
        let pairing_score = self.score_pairing(mode, &content.text, &images).await;

        self.checkpoint(job_id, 7, "Generating report");
        let report = build_report(
            &ReportInputs {
                mode,
                source_name: filename.to_string(),
                text: text_score,
                image: image_score,
                consistency: pairing_score,
                layout: content.layout,
            },
            Utc::now(),
        );

        let results = serde_json::to_value(&report)
            .map_err(|e| PipelineError::Processing(format!("report serialization: {}", e)))?;

        self.persist_report(filename, &results).await;

        Ok(results)
    }

    async fn read_staged_file(&self, job_id: &str) -> Result<Vec<u8>, PipelineError> {
        let path = self
            .tracker
            .get(job_id)
            .and_then(|job| job.temp_path)
            .ok_or_else(|| PipelineError::Processing("staged file missing".to_string()))?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| PipelineError::Processing(format!("staged file read: {}", e)))
    }

    /// Archives the raw upload. Failure here is fatal: the raw artifact is
    /// the audit trail for every downstream score.
    async fn upload_raw(&self, filename: &str, bytes: &[u8]) -> Result<(), PipelineError> {
        let name = format!("{}_{}", Utc::now().timestamp(), filename);
        self.store
            .put(
                &self.upload_container,
                &name,
                bytes.to_vec(),
                "application/octet-stream",
            )
            .await?;
        Ok(())
    }

    async fn extract(
        &self,
        bytes: &[u8],
        mode: AnalysisMode,
    ) -> Result<(ExtractedContent, Vec<Vec<u8>>), PipelineError> {
        match mode {
            AnalysisMode::Screenshot => {
                let content =
                    extract::extract_from_screenshot(self.oracle.as_ref(), bytes).await?;
                let images = extract::proxy_regions(bytes, &content.image_regions);
                Ok((content, images))
            }
            AnalysisMode::Pdf => {
                let pdf = extract::extract_from_pdf(bytes)?;
                let content = ExtractedContent {
                    text: pdf.text,
                    image_regions: Vec::new(),
                    layout: LayoutInfo {
                        source_type: "pdf_document".to_string(),
                        ..LayoutInfo::default()
                    },
                };
                Ok((content, pdf.images))
            }
        }
    }

    async fn score_pairing(
        &self,
        mode: AnalysisMode,
        text: &str,
        images: &[Vec<u8>],
    ) -> DimensionScore {
        match mode {
            AnalysisMode::Screenshot => {
                analysis::score_consistency(self.oracle.as_ref(), text, images).await
            }
            // PDF mode carries coherence as detail only; its weight is 0.
            AnalysisMode::Pdf => {
                analysis::score_coherence(self.oracle.as_ref(), text, images).await
            }
        }
    }

    /// Persists the report blob. Best effort: a storage fault here is
    /// logged and the job still completes with inline results.
    async fn persist_report(&self, filename: &str, results: &Value) {
        let name = report_blob_name(filename, Utc::now());
        let payload = match serde_json::to_vec_pretty(results) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Report payload serialization failed, skipping upload");
                return;
            }
        };

        if let Err(e) = self
            .store
            .put(&self.report_container, &name, payload, "application/json")
            .await
        {
            warn!(report = name, error = %e, "Report upload failed, job completes with inline results");
        }
    }

    fn checkpoint(&self, job_id: &str, stage: usize, message: &str) {
        let (status, progress) = PROGRESS_CHECKPOINTS[stage];
        self.tracker.update(job_id, status, progress, message);
    }
}
