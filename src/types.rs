use crate::error::PipelineError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one document render.
///
/// Exactly one of `document` and `error` is present once an attempt has
/// completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Whether the document was generated.
    pub success: bool,

    /// Generated document bytes. Present only on success. Excluded from
    /// serialization; the JSON contract carries metadata, not payloads.
    #[serde(skip)]
    pub document: Option<Bytes>,

    /// Output filename (e.g. `abc-123_ComplaintForm.pdf`).
    pub filename: String,

    /// Size of the generated document in bytes.
    pub size: usize,

    /// Failure details. Present only on failure.
    pub error: Option<PipelineError>,

    /// Template the document was rendered from.
    pub template: String,

    /// Upload outcome, attached by the single-document flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadResult>,
}

impl RenderResult {
    /// Successful render carrying the document payload.
    pub fn generated(
        template: impl Into<String>,
        filename: impl Into<String>,
        document: Bytes,
    ) -> Self {
        let size = document.len();
        Self {
            success: true,
            document: Some(document),
            filename: filename.into(),
            size,
            error: None,
            template: template.into(),
            upload: None,
        }
    }

    /// Failed render carrying the error.
    pub fn failed(
        template: impl Into<String>,
        filename: impl Into<String>,
        error: PipelineError,
    ) -> Self {
        Self {
            success: false,
            document: None,
            filename: filename.into(),
            size: 0,
            error: Some(error),
            template: template.into(),
            upload: None,
        }
    }
}

/// Outcome of one document upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Whether the document was stored.
    pub success: bool,

    /// Filename tag, set by batch flows so entries stay identifiable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Resolved destination path. Present only on success.
    pub path: Option<String>,

    /// Bytes uploaded.
    pub size: usize,

    /// Failure details. Present only on failure.
    pub error: Option<PipelineError>,
}

impl UploadResult {
    /// Successful upload to the given resolved path.
    pub fn stored(path: impl Into<String>, size: usize) -> Self {
        Self {
            success: true,
            filename: None,
            path: Some(path.into()),
            size,
            error: None,
        }
    }

    /// Failed upload carrying the error.
    pub fn failed(error: PipelineError) -> Self {
        Self {
            success: false,
            filename: None,
            path: None,
            size: 0,
            error: Some(error),
        }
    }

    /// Tag this result with the filename it belongs to.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Aggregated outcome of rendering a set of templates for one case.
///
/// `successful + failed == total == documents.len()` at all times; use
/// [`push`](Self::push) to keep the counters in sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderBatch {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Per-document outcomes, in input order.
    pub documents: Vec<RenderResult>,
}

impl RenderBatch {
    /// Record one outcome.
    pub fn push(&mut self, result: RenderResult) {
        self.total += 1;
        if result.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.documents.push(result);
    }
}

/// Aggregated outcome of uploading the documents of one case.
///
/// Same counter invariant as [`RenderBatch`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadBatch {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Per-upload outcomes, in input order.
    pub uploads: Vec<UploadResult>,
}

impl UploadBatch {
    /// Record one outcome.
    pub fn push(&mut self, result: UploadResult) {
        self.total += 1;
        if result.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.uploads.push(result);
    }
}

/// Complete outcome of the per-case pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Case the pipeline ran for.
    pub case_id: String,

    /// True once at least one document was generated. Upload failures do
    /// not clear it.
    pub success: bool,

    /// Number of documents generated.
    pub documents_generated: usize,

    /// Number of documents uploaded.
    pub documents_uploaded: usize,

    /// Per-document render outcomes.
    pub documents: Vec<RenderResult>,

    /// Per-document upload outcomes. Empty when uploads were skipped.
    pub uploads: Vec<UploadResult>,

    /// The error that stopped the pipeline, if any.
    pub error: Option<PipelineError>,

    /// When the pipeline finished with this case.
    pub completed_at: DateTime<Utc>,
}

impl PipelineResult {
    /// Zero-activity scaffold for a case; the pipeline fills it in as
    /// stages complete.
    pub(crate) fn empty(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            success: false,
            documents_generated: 0,
            documents_uploaded: 0,
            documents: Vec::new(),
            uploads: Vec::new(),
            error: None,
            completed_at: Utc::now(),
        }
    }
}
