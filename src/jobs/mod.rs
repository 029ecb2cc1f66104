//! In-memory job tracking.
//!
//! Every upload becomes a [`Job`] keyed by a generated id. The tracker is
//! the only writer of job state; handlers read cloned snapshots, so no
//! caller ever holds a lock across an await. Terminal jobs are frozen:
//! once `completed` or `error` is written, further status updates are
//! ignored.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Fixed progress checkpoints in pipeline execution order. Clients can
/// rely on this exact ramp; intermediate percentages never appear.
pub const PROGRESS_CHECKPOINTS: [(JobStatus, u8); 9] = [
    (JobStatus::Processing, 5),
    (JobStatus::Processing, 10),
    (JobStatus::ExtractingText, 20),
    (JobStatus::Processing, 35),
    (JobStatus::AnalyzingText, 50),
    (JobStatus::AnalyzingImages, 70),
    (JobStatus::Processing, 85),
    (JobStatus::GeneratingReport, 95),
    (JobStatus::Completed, 100),
];

/// Lifecycle states of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Uploaded,
    Processing,
    ExtractingText,
    AnalyzingText,
    AnalyzingImages,
    GeneratingReport,
    Completed,
    Error,
}

impl JobStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Uploaded => "uploaded",
            JobStatus::Processing => "processing",
            JobStatus::ExtractingText => "extracting_text",
            JobStatus::AnalyzingText => "analyzing_text",
            JobStatus::AnalyzingImages => "analyzing_images",
            JobStatus::GeneratingReport => "generating_report",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tracked analysis job. `results` and `error` are mutually exclusive;
/// exactly one is populated once the job reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub filename: String,
    pub status: JobStatus,
    pub message: String,
    /// Monotonically increasing progress percentage, 0 to 100.
    pub progress: u8,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub temp_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Concurrent job registry behind a [`parking_lot::RwLock`].
#[derive(Debug, Default)]
pub struct JobTracker {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh job in the `uploaded` state.
    pub fn create(&self, id: &str, filename: &str, file_size: u64, temp_path: PathBuf) -> Job {
        let now = Utc::now();
        let job = Job {
            id: id.to_string(),
            filename: filename.to_string(),
            status: JobStatus::Uploaded,
            message: "File uploaded, queued for analysis".to_string(),
            progress: 0,
            file_size,
            results: None,
            error: None,
            temp_path: Some(temp_path),
            created_at: now,
            updated_at: now,
        };

        self.jobs.write().insert(id.to_string(), job.clone());
        debug!(job_id = id, filename, file_size, "Job created");
        job
    }

    /// Snapshot of one job, if known.
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().get(id).cloned()
    }

    /// Advances a non-terminal job. Updates on unknown or terminal jobs
    /// are dropped with a warning.
    pub fn update(&self, id: &str, status: JobStatus, progress: u8, message: &str) {
        let mut jobs = self.jobs.write();
        let Some(job) = jobs.get_mut(id) else {
            warn!(job_id = id, "Status update for unknown job dropped");
            return;
        };
        if job.status.is_terminal() {
            warn!(
                job_id = id,
                current = %job.status,
                attempted = %status,
                "Status update on terminal job dropped"
            );
            return;
        }

        job.status = status;
        job.progress = progress.min(100);
        job.message = message.to_string();
        job.updated_at = Utc::now();
    }

    /// Transitions a job to `completed` with its attached results.
    pub fn set_completed(&self, id: &str, results: Value) {
        let mut jobs = self.jobs.write();
        let Some(job) = jobs.get_mut(id) else {
            warn!(job_id = id, "Completion for unknown job dropped");
            return;
        };
        if job.status.is_terminal() {
            warn!(job_id = id, current = %job.status, "Completion on terminal job dropped");
            return;
        }

        job.status = JobStatus::Completed;
        job.progress = 100;
        job.message = "Analysis complete".to_string();
        job.results = Some(results);
        job.error = None;
        job.updated_at = Utc::now();
    }

    /// Transitions a job to the terminal `error` state.
    pub fn set_error(&self, id: &str, message: &str) {
        let mut jobs = self.jobs.write();
        let Some(job) = jobs.get_mut(id) else {
            warn!(job_id = id, "Error for unknown job dropped");
            return;
        };
        if job.status.is_terminal() {
            warn!(job_id = id, current = %job.status, "Error on terminal job dropped");
            return;
        }

        job.status = JobStatus::Error;
        job.message = message.to_string();
        job.error = Some(message.to_string());
        job.results = None;
        job.updated_at = Utc::now();
    }

    /// Detaches the staged temp file path from a job, returning it for
    /// deletion. Allowed in any state, terminal included.
    pub fn take_temp_path(&self, id: &str) -> Option<PathBuf> {
        self.jobs.write().get_mut(id).and_then(|job| job.temp_path.take())
    }

    /// Removes a job outright. Returns the removed job so the caller can
    /// clean up its staged file.
    pub fn delete(&self, id: &str) -> Option<Job> {
        self.jobs.write().remove(id)
    }

    /// Drops jobs older than `max_age`, returning how many were removed.
    ///
    /// A `max_age` too large for the calendar math saturates instead of
    /// shrinking; no job can be older than that, so nothing is swept.
    pub fn sweep(&self, max_age: Duration) -> usize {
        let age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        let Some(cutoff) = Utc::now().checked_sub_signed(age) else {
            return 0;
        };
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| job.created_at > cutoff);
        let removed = before - jobs.len();
        if removed > 0 {
            debug!(removed, remaining = jobs.len(), "Swept expired jobs");
        }
        removed
    }

    /// Snapshot of all jobs, newest first.
    pub fn list(&self) -> Vec<Job> {
        let mut all: Vec<Job> = self.jobs.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
