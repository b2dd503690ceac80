use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the pipeline and its clients.
///
/// Carried inside [`RenderResult`](crate::types::RenderResult) and
/// [`UploadResult`](crate::types::UploadResult) rather than returned as `Err`
/// from the public operations, so batches can hold per-item failures.
/// Serializes with a `kind` tag alongside the context fields.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineError {
    /// Upload was requested while the storage client is switched off.
    #[error("upload disabled")]
    UploadDisabled,

    /// A required setting is missing (endpoint, access token).
    #[error("{what} not configured")]
    NotConfigured { what: String },

    /// The remote service answered with a non-success status code.
    #[error("service returned {status}: {body}")]
    Rejected {
        /// HTTP status code (e.g. 400, 500, 503).
        status: u16,
        /// Response body text, truncated to a snippet.
        body: String,
    },

    /// The request exceeded the configured deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The request never completed (connection refused, DNS failure, etc.).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// No case data exists for the requested id.
    #[error("case not found: {case_id}")]
    CaseNotFound { case_id: String },

    /// Placeholder recorded for a document whose render failed, so upload
    /// batches stay aligned with render batches.
    #[error("document generation failed")]
    GenerationFailed,

    /// A case produced zero successful documents.
    #[error("no documents generated successfully")]
    NoDocumentsGenerated,

    /// Catch-all for other errors.
    #[error("{message}")]
    Other { message: String },
}

impl PipelineError {
    /// Stable snake_case name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::UploadDisabled => "upload_disabled",
            PipelineError::NotConfigured { .. } => "not_configured",
            PipelineError::Rejected { .. } => "rejected",
            PipelineError::Timeout { .. } => "timeout",
            PipelineError::Transport { .. } => "transport",
            PipelineError::CaseNotFound { .. } => "case_not_found",
            PipelineError::GenerationFailed => "generation_failed",
            PipelineError::NoDocumentsGenerated => "no_documents_generated",
            PipelineError::Other { .. } => "other",
        }
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Other {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
