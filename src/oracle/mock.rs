use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::OracleError;
use super::{ChatRequest, OracleClient};

/// Scripted response for the mock oracle.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Completion text returned verbatim.
    Ok(String),
    /// Simulated upstream API fault.
    ApiError { status: u16, message: String },
    /// Simulated per-call timeout.
    Timeout,
}

/// Queue-driven oracle for tests.
///
/// Responses pop in FIFO order; when the queue is empty, `default_response`
/// is returned. Every call (including ones that fail) bumps the counter so
/// tests can assert the oracle was or was not reached.
#[derive(Default)]
pub struct MockOracleClient {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    default_response: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockOracleClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every call with the same completion.
    pub fn with_default_response(response: impl Into<String>) -> Self {
        let mock = Self::new();
        *mock.default_response.lock() = Some(response.into());
        mock
    }

    pub fn push_response(&self, response: ScriptedResponse) {
        self.responses.lock().push_back(response);
    }

    pub fn push_ok(&self, completion: impl Into<String>) {
        self.push_response(ScriptedResponse::Ok(completion.into()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OracleClient for MockOracleClient {
    async fn complete(&self, _request: ChatRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.responses.lock().pop_front();
        match scripted {
            Some(ScriptedResponse::Ok(text)) => Ok(text),
            Some(ScriptedResponse::ApiError { status, message }) => {
                Err(OracleError::Api { status, message })
            }
            Some(ScriptedResponse::Timeout) => Err(OracleError::Timeout),
            None => match self.default_response.lock().clone() {
                Some(text) => Ok(text),
                None => Err(OracleError::EmptyResponse),
            },
        }
    }
}
