//! Pipeline orchestrator — fetch, render, upload for one case.
//!
//! [`DocumentPipeline`] sequences the three steps and aggregates a single
//! [`PipelineResult`]. Collaborators are injected at construction: a
//! [`RenderClient`], a [`StorageClient`], and a [`CaseDataProvider`].
//!
//! The public operations never return `Err`. Anything that escapes a step
//! is caught at the top and folded into a failure result, so HTTP handlers
//! and job runners can report outcomes without their own catch layer.

use crate::error::{PipelineError, Result};
use crate::provider::CaseDataProvider;
use crate::render::{output_filename, RenderClient, RenderRequest};
use crate::storage::{StorageClient, UploadRequest};
use crate::types::{PipelineResult, RenderResult};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Orchestrates document generation and delivery for cases.
///
/// # Example
///
/// ```ignore
/// use doc_pipeline::{DocumentPipeline, RenderClient, StorageClient};
/// use doc_pipeline::config::{RenderConfig, UploadConfig};
/// use std::sync::Arc;
///
/// let pipeline = DocumentPipeline::new(
///     RenderClient::new(RenderConfig::from_env()),
///     StorageClient::new(UploadConfig::from_env()),
///     Arc::new(my_case_provider),
/// );
/// let result = pipeline.generate_documents_for_case("abc-123", None, true).await;
/// ```
pub struct DocumentPipeline {
    render: RenderClient,
    storage: StorageClient,
    provider: Arc<dyn CaseDataProvider>,
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("render_configured", &self.render.is_configured())
            .field("storage_enabled", &self.storage.is_enabled())
            .finish()
    }
}

impl DocumentPipeline {
    pub fn new(
        render: RenderClient,
        storage: StorageClient,
        provider: Arc<dyn CaseDataProvider>,
    ) -> Self {
        Self {
            render,
            storage,
            provider,
        }
    }

    /// Whether document generation can run. Delegates to the render client;
    /// storage is optional and checked per run.
    pub fn is_configured(&self) -> bool {
        self.render.is_configured()
    }

    /// Generate every document for a case, then deliver the successful ones.
    ///
    /// Steps: fetch case data, render each template, upload best-effort.
    /// The result is marked successful once at least one document was
    /// generated; upload failures are recorded but never flip it back.
    pub async fn generate_documents_for_case(
        &self,
        case_id: &str,
        templates: Option<&[String]>,
        upload_enabled: bool,
    ) -> PipelineResult {
        let mut result = match self.run_case(case_id, templates, upload_enabled).await {
            Ok(result) => result,
            Err(err) => {
                error!(case_id = %case_id, error = %err, "document generation failed");
                let mut result = PipelineResult::empty(case_id);
                result.error = Some(err);
                result
            }
        };
        result.completed_at = Utc::now();
        result
    }

    async fn run_case(
        &self,
        case_id: &str,
        templates: Option<&[String]>,
        upload_enabled: bool,
    ) -> Result<PipelineResult> {
        info!(case_id = %case_id, "starting document generation");

        let mut result = PipelineResult::empty(case_id);

        // Step 1: case data
        let Some(case_data) = self.fetch_case_data(case_id).await? else {
            error!(case_id = %case_id, "case not found");
            result.error = Some(PipelineError::CaseNotFound {
                case_id: case_id.to_string(),
            });
            return Ok(result);
        };

        // Step 2: render
        let batch = self
            .render
            .render_case_documents(case_id, &case_data, templates)
            .await;
        result.documents_generated = batch.successful;

        if batch.successful == 0 {
            error!(case_id = %case_id, "no documents generated successfully");
            result.documents = batch.documents;
            result.error = Some(PipelineError::NoDocumentsGenerated);
            return Ok(result);
        }

        // Step 3: upload, best effort
        if upload_enabled && self.storage.is_enabled() {
            let uploads = self
                .storage
                .upload_case_documents(case_id, &batch.documents)
                .await;
            result.documents_uploaded = uploads.successful;
            result.uploads = uploads.uploads;
        } else {
            info!(case_id = %case_id, "upload skipped (disabled or not configured)");
        }

        result.documents = batch.documents;
        result.success = true;

        info!(
            case_id = %case_id,
            generated = result.documents_generated,
            uploaded = result.documents_uploaded,
            "document generation complete"
        );

        Ok(result)
    }

    /// Generate one document for a case, attaching the upload outcome to
    /// the render result when delivery runs.
    pub async fn generate_single_document(
        &self,
        case_id: &str,
        template: &str,
        upload_enabled: bool,
    ) -> RenderResult {
        match self.run_single(case_id, template, upload_enabled).await {
            Ok(result) => result,
            Err(err) => {
                error!(
                    case_id = %case_id,
                    template = %template,
                    error = %err,
                    "single document generation failed"
                );
                RenderResult::failed(template, output_filename(case_id, template), err)
            }
        }
    }

    async fn run_single(
        &self,
        case_id: &str,
        template: &str,
        upload_enabled: bool,
    ) -> Result<RenderResult> {
        info!(case_id = %case_id, template = %template, "generating single document");

        let filename = output_filename(case_id, template);

        let Some(case_data) = self.fetch_case_data(case_id).await? else {
            error!(case_id = %case_id, "case not found");
            return Ok(RenderResult::failed(
                template,
                filename,
                PipelineError::CaseNotFound {
                    case_id: case_id.to_string(),
                },
            ));
        };

        let request = RenderRequest::new(template, filename).with_data(case_data);
        let mut result = self.render.render(&request).await;

        if upload_enabled && self.storage.is_enabled() {
            if let Some(bytes) = result.document.as_ref().filter(|_| result.success) {
                let path = format!("Cases/{}/{}", case_id, result.filename);
                let upload = self
                    .storage
                    .upload(&UploadRequest::new(bytes.clone(), path))
                    .await;
                result.upload = Some(upload);
            }
        }

        Ok(result)
    }

    async fn fetch_case_data(&self, case_id: &str) -> Result<Option<Value>> {
        info!(case_id = %case_id, "fetching case data");
        self.provider.fetch(case_id).await
    }
}
