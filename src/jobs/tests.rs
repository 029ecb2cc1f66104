use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use super::*;

fn tracker_with_job(id: &str) -> JobTracker {
    let tracker = JobTracker::new();
    tracker.create(id, "capture.png", 4096, PathBuf::from("/tmp/capture.png"));
    tracker
}

#[test]
fn test_create_starts_uploaded_at_zero_progress() {
    let tracker = tracker_with_job("job-1");

    let job = tracker.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Uploaded);
    assert_eq!(job.progress, 0);
    assert_eq!(job.filename, "capture.png");
    assert_eq!(job.file_size, 4096);
    assert!(job.results.is_none());
    assert!(job.error.is_none());
}

#[test]
fn test_get_unknown_job_is_none() {
    let tracker = JobTracker::new();
    assert!(tracker.get("missing").is_none());
}

#[test]
fn test_update_advances_status_and_progress() {
    let tracker = tracker_with_job("job-1");

    tracker.update("job-1", JobStatus::ExtractingText, 20, "Extracting text via OCR");

    let job = tracker.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::ExtractingText);
    assert_eq!(job.progress, 20);
    assert_eq!(job.message, "Extracting text via OCR");
    assert!(job.updated_at >= job.created_at);
}

#[test]
fn test_update_unknown_job_is_a_noop() {
    let tracker = JobTracker::new();
    tracker.update("missing", JobStatus::Processing, 5, "msg");
    assert!(tracker.is_empty());
}

#[test]
fn test_completed_job_is_frozen() {
    let tracker = tracker_with_job("job-1");
    tracker.set_completed("job-1", json!({"final_score": 71.5}));

    tracker.update("job-1", JobStatus::Processing, 5, "late update");
    tracker.set_error("job-1", "late error");

    let job = tracker.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.results, Some(json!({"final_score": 71.5})));
    assert!(job.error.is_none());
}

#[test]
fn test_error_job_is_frozen() {
    let tracker = tracker_with_job("job-1");
    tracker.set_error("job-1", "Validation error: file too small");

    tracker.set_completed("job-1", json!({}));
    tracker.update("job-1", JobStatus::Processing, 50, "late");

    let job = tracker.get("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert_eq!(job.error.as_deref(), Some("Validation error: file too small"));
    assert!(job.results.is_none());
}

#[test]
fn test_results_and_error_are_mutually_exclusive() {
    let tracker = tracker_with_job("ok");
    tracker.set_completed("ok", json!({"verdict": "CREDIBLE"}));
    let job = tracker.get("ok").unwrap();
    assert!(job.results.is_some() && job.error.is_none());

    let tracker = tracker_with_job("bad");
    tracker.set_error("bad", "boom");
    let job = tracker.get("bad").unwrap();
    assert!(job.error.is_some() && job.results.is_none());
}

#[test]
fn test_take_temp_path_works_on_terminal_jobs() {
    let tracker = tracker_with_job("job-1");
    tracker.set_error("job-1", "failed");

    let path = tracker.take_temp_path("job-1");
    assert_eq!(path, Some(PathBuf::from("/tmp/capture.png")));
    assert!(tracker.take_temp_path("job-1").is_none());
}

#[test]
fn test_delete_returns_removed_job() {
    let tracker = tracker_with_job("job-1");

    let removed = tracker.delete("job-1").unwrap();
    assert_eq!(removed.id, "job-1");
    assert!(tracker.get("job-1").is_none());
    assert!(tracker.delete("job-1").is_none());
}

#[test]
fn test_sweep_removes_only_expired_jobs() {
    let tracker = tracker_with_job("old");
    tracker.create("new", "b.png", 2048, PathBuf::from("/tmp/b.png"));

    {
        let mut jobs = tracker.jobs.write();
        jobs.get_mut("old").unwrap().created_at = Utc::now() - chrono::Duration::hours(25);
    }

    let removed = tracker.sweep(Duration::from_secs(24 * 3600));
    assert_eq!(removed, 1);
    assert!(tracker.get("old").is_none());
    assert!(tracker.get("new").is_some());
}

#[test]
fn test_sweep_with_huge_max_age_removes_nothing() {
    // A max age past what the calendar math can represent must keep every
    // job, not silently shrink to some shorter window.
    let tracker = tracker_with_job("ancient");
    {
        let mut jobs = tracker.jobs.write();
        jobs.get_mut("ancient").unwrap().created_at = Utc::now() - chrono::Duration::days(365 * 10);
    }

    let removed = tracker.sweep(Duration::from_secs(u64::MAX));
    assert_eq!(removed, 0);
    assert!(tracker.get("ancient").is_some());
}

#[test]
fn test_list_is_newest_first() {
    let tracker = tracker_with_job("first");
    {
        let mut jobs = tracker.jobs.write();
        jobs.get_mut("first").unwrap().created_at = Utc::now() - chrono::Duration::minutes(10);
    }
    tracker.create("second", "b.png", 1, PathBuf::from("/tmp/b.png"));

    let all = tracker.list();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "second");
    assert_eq!(all[1].id, "first");
}

#[test]
fn test_progress_is_capped_at_100() {
    let tracker = tracker_with_job("job-1");
    tracker.update("job-1", JobStatus::Processing, 150, "overflow");
    assert_eq!(tracker.get("job-1").unwrap().progress, 100);
}

#[test]
fn test_progress_checkpoints_ramp_monotonically_to_completion() {
    let percentages: Vec<u8> = PROGRESS_CHECKPOINTS.iter().map(|(_, p)| *p).collect();
    let mut sorted = percentages.clone();
    sorted.sort_unstable();
    assert_eq!(percentages, sorted);

    let (last_status, last_progress) = PROGRESS_CHECKPOINTS[PROGRESS_CHECKPOINTS.len() - 1];
    assert_eq!(last_status, JobStatus::Completed);
    assert_eq!(last_progress, 100);
}

#[test]
fn test_status_serializes_snake_case() {
    let v = serde_json::to_value(JobStatus::ExtractingText).unwrap();
    assert_eq!(v, "extracting_text");
    assert_eq!(JobStatus::GeneratingReport.as_str(), "generating_report");
}

#[test]
fn test_temp_path_is_not_serialized() {
    let tracker = tracker_with_job("job-1");
    let job = tracker.get("job-1").unwrap();
    let v = serde_json::to_value(&job).unwrap();
    assert!(v.get("temp_path").is_none());
}
