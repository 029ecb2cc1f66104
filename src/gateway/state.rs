use std::sync::Arc;

use crate::jobs::JobTracker;
use crate::oracle::OracleClient;
use crate::pipeline::Pipeline;
use crate::storage::BlobStore;

/// Shared handler state. All fields are `Arc`-backed so clones are cheap;
/// axum clones the state per request.
pub struct HandlerState<O: OracleClient + ?Sized + 'static, S: BlobStore + ?Sized + 'static> {
    pub tracker: Arc<JobTracker>,
    pub pipeline: Arc<Pipeline<O, S>>,
    pub max_upload_bytes: u64,
}

impl<O: OracleClient + ?Sized, S: BlobStore + ?Sized> HandlerState<O, S> {
    pub fn new(
        tracker: Arc<JobTracker>,
        pipeline: Arc<Pipeline<O, S>>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            tracker,
            pipeline,
            max_upload_bytes,
        }
    }
}

impl<O: OracleClient + ?Sized, S: BlobStore + ?Sized> Clone for HandlerState<O, S> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
            pipeline: self.pipeline.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
