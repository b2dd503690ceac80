//! Mock transport for testing without live services.
//!
//! [`MockTransport`] returns scripted outcomes in order and records every
//! request it sees, so tests can assert on call counts and payloads without
//! a render server or storage account.
//!
//! # Example
//!
//! ```
//! use doc_pipeline::transport::MockTransport;
//!
//! let mock = MockTransport::ok(b"%PDF-1.4 fake".as_slice());
//! assert_eq!(mock.calls(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{Transport, TransportRequest, TransportResponse};
use crate::error::Result;
use crate::PipelineError;

/// One scripted result for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Respond 200 with the given body.
    Ok(Bytes),
    /// Fail with the given error.
    Err(PipelineError),
}

/// A test transport that returns scripted outcomes in order.
///
/// Cycles back to the beginning when all outcomes have been consumed.
#[derive(Debug)]
pub struct MockTransport {
    outcomes: Vec<MockOutcome>,
    index: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    /// Create a mock with the given scripted outcomes.
    ///
    /// Outcomes are returned in order. When exhausted, cycles from the
    /// beginning.
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        assert!(
            !outcomes.is_empty(),
            "MockTransport requires at least one outcome"
        );
        Self {
            outcomes,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always responds 200 with the same body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(vec![MockOutcome::Ok(body.into())])
    }

    /// Create a mock that always fails with the same error.
    pub fn failing(error: PipelineError) -> Self {
        Self::new(vec![MockOutcome::Err(error)])
    }

    /// Number of requests executed so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// Snapshot of every request seen, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }

    fn next_outcome(&self) -> MockOutcome {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.outcomes.len();
        self.outcomes[idx].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request.clone());

        match self.next_outcome() {
            MockOutcome::Ok(body) => Ok(TransportResponse { status: 200, body }),
            MockOutcome::Err(err) => Err(err),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
