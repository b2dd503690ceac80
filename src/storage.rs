//! Storage upload client — delivers rendered documents to cloud storage.
//!
//! [`StorageClient`] posts raw document bytes to a content-upload endpoint,
//! authenticating with a bearer token and describing the destination in a
//! `Dropbox-API-Arg` JSON header. Uploads are best-effort: a disabled or
//! unconfigured client fails fast without touching the network, and no
//! upload failure ever aborts a batch.

use crate::config::UploadConfig;
use crate::error::PipelineError;
use crate::transport::{HttpTransport, RequestBody, Transport, TransportRequest};
use crate::types::{RenderResult, UploadBatch, UploadResult};
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Fixed deadline for upload requests. The render timeout is configurable
/// because merge jobs vary in size; uploads are a single bounded POST.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// One upload invocation.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Document bytes to store.
    pub bytes: Bytes,

    /// Destination path relative to the configured base path.
    pub path: String,

    /// Whether to replace an existing file. Default: true.
    pub overwrite: bool,
}

impl UploadRequest {
    pub fn new(bytes: impl Into<Bytes>, path: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            path: path.into(),
            overwrite: true,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Join the configured base path with a relative destination, collapsing
/// doubled separators.
///
/// # Example
///
/// ```
/// use doc_pipeline::storage::join_storage_path;
///
/// assert_eq!(
///     join_storage_path("/Apps/LegalFormApp", "Cases/abc-123/doc.pdf"),
///     "/Apps/LegalFormApp/Cases/abc-123/doc.pdf"
/// );
/// ```
pub fn join_storage_path(base: &str, relative: &str) -> String {
    let mut joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    );
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    joined
}

/// Client for the storage content-upload API.
///
/// Public operations never return `Err`; every outcome lands in an
/// [`UploadResult`].
pub struct StorageClient {
    config: UploadConfig,
    transport: Arc<dyn Transport>,
}

impl StorageClient {
    /// Create a client using the production HTTP transport.
    pub fn new(config: UploadConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client with an injected transport.
    pub fn with_transport(config: UploadConfig, transport: Arc<dyn Transport>) -> Self {
        if config.enabled && config.access_token.is_none() {
            warn!("storage enabled but no access token set, uploads will fail");
        }
        Self { config, transport }
    }

    /// Whether uploads can proceed: enabled with an access token present.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.access_token.is_some()
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Upload one document.
    ///
    /// A disabled client fails with `UploadDisabled` and a missing token
    /// with `NotConfigured`; neither touches the network. Each upload is a
    /// single attempt under [`UPLOAD_TIMEOUT`].
    pub async fn upload(&self, request: &UploadRequest) -> UploadResult {
        if !self.config.enabled {
            debug!("upload disabled, skipping");
            return UploadResult::failed(PipelineError::UploadDisabled);
        }

        let Some(token) = self.config.access_token.as_deref() else {
            let err = PipelineError::NotConfigured {
                what: "storage access token".to_string(),
            };
            error!(error = %err, "cannot upload");
            return UploadResult::failed(err);
        };

        let destination = join_storage_path(&self.config.base_path, &request.path);

        info!(path = %destination, size = request.bytes.len(), "uploading document");

        let transport_request = TransportRequest {
            url: self.config.endpoint.clone(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", token)),
                (
                    "Dropbox-API-Arg".to_string(),
                    Self::api_arg(&destination, request.overwrite),
                ),
            ],
            body: RequestBody::Bytes(request.bytes.clone()),
            timeout: UPLOAD_TIMEOUT,
        };

        match self.transport.execute(&transport_request).await {
            Ok(_) => {
                info!(path = %destination, "upload complete");
                UploadResult::stored(destination, request.bytes.len())
            }
            Err(err) => {
                error!(path = %destination, kind = err.kind(), error = %err, "upload failed");
                UploadResult::failed(err)
            }
        }
    }

    /// Upload the documents of a render batch to `Cases/{case_id}/`.
    ///
    /// Every input document yields exactly one entry, in order: failed
    /// renders become `GenerationFailed` entries without a network call,
    /// and a disabled or unconfigured client records its refusal per
    /// document instead of returning an empty batch.
    pub async fn upload_case_documents(
        &self,
        case_id: &str,
        documents: &[RenderResult],
    ) -> UploadBatch {
        info!(case_id = %case_id, count = documents.len(), "uploading case documents");

        let mut batch = UploadBatch::default();
        for doc in documents {
            let Some(bytes) = doc.document.as_ref().filter(|_| doc.success) else {
                warn!(filename = %doc.filename, "skipping upload for failed document");
                batch.push(
                    UploadResult::failed(PipelineError::GenerationFailed)
                        .with_filename(&doc.filename),
                );
                continue;
            };

            let path = format!("Cases/{}/{}", case_id, doc.filename);
            let result = self
                .upload(&UploadRequest::new(bytes.clone(), path))
                .await
                .with_filename(&doc.filename);
            batch.push(result);
        }

        info!(
            case_id = %case_id,
            successful = batch.successful,
            total = batch.total,
            "case uploads complete"
        );

        batch
    }

    /// Build the `Dropbox-API-Arg` header value: a JSON object carrying
    /// the destination path and write mode.
    fn api_arg(path: &str, overwrite: bool) -> String {
        json!({
            "path": path,
            "mode": if overwrite { "overwrite" } else { "add" },
        })
        .to_string()
    }
}
