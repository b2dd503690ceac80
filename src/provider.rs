//! Case data boundary.
//!
//! [`CaseDataProvider`] abstracts the database and JSON-shaping service that
//! produce the merge data for a case. The pipeline consumes it as
//! `Arc<dyn CaseDataProvider>`; [`InMemoryCaseData`] ships for tests and
//! demos.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Source of normalized case data for template merging.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as
/// `Arc<dyn CaseDataProvider>`.
#[async_trait]
pub trait CaseDataProvider: Send + Sync {
    /// Fetch the merge data for a case.
    ///
    /// `Ok(None)` means no case exists under the id. `Err` is reserved for
    /// genuine lookup failures (connection loss, malformed rows), which
    /// stop the pipeline with that error rather than "not found".
    async fn fetch(&self, case_id: &str) -> Result<Option<Value>>;
}

/// Provider backed by a fixed map, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseData {
    cases: HashMap<String, Value>,
}

impl InMemoryCaseData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case.
    pub fn with_case(mut self, case_id: impl Into<String>, data: Value) -> Self {
        self.cases.insert(case_id.into(), data);
        self
    }
}

#[async_trait]
impl CaseDataProvider for InMemoryCaseData {
    async fn fetch(&self, case_id: &str) -> Result<Option<Value>> {
        Ok(self.cases.get(case_id).cloned())
    }
}
