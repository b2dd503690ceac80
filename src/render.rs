//! Render client — turns case data into documents via the merge API.
//!
//! [`RenderClient`] posts a template name, merge data, and desired output
//! name to the render endpoint and hands back the generated bytes as a
//! [`RenderResult`]. Transient failures (timeouts, 5xx) are retried with
//! exponential backoff per the configured [`BackoffConfig`](crate::transport::BackoffConfig).
//!
//! # Example
//!
//! ```ignore
//! use doc_pipeline::{RenderClient, RenderRequest, config::RenderConfig};
//! use serde_json::json;
//!
//! let client = RenderClient::new(RenderConfig::from_env());
//! let request = RenderRequest::new("ComplaintForm.docx", "abc-123_ComplaintForm.pdf")
//!     .with_data(json!({"plaintiff": "Jane Roe"}));
//! let result = client.render(&request).await;
//! ```

use crate::config::RenderConfig;
use crate::error::PipelineError;
use crate::transport::{
    with_backoff, HttpTransport, RequestBody, Transport, TransportRequest,
};
use crate::types::{RenderBatch, RenderResult};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Templates rendered for a case when the caller does not pass a list.
pub const DEFAULT_TEMPLATES: [&str; 3] = [
    "ComplaintForm.docx",
    "DiscoveryRequest.docx",
    "SummonsForm.docx",
];

/// One render invocation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Template to merge (e.g. `ComplaintForm.docx`).
    pub template: String,

    /// Merge data for the template. Default: empty object.
    pub data: Value,

    /// Desired output filename.
    pub output_name: String,

    /// Output format. Default: `"pdf"`.
    pub format: String,
}

impl RenderRequest {
    pub fn new(template: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            data: Value::Object(Default::default()),
            output_name: output_name.into(),
            format: "pdf".to_string(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Derive the output filename for a case document.
///
/// `{case_id}_{stem}.pdf`, where the stem is the template name with a
/// trailing `.docx` removed. Other extensions pass through untouched.
///
/// # Example
///
/// ```
/// use doc_pipeline::render::output_filename;
///
/// assert_eq!(
///     output_filename("abc-123", "ComplaintForm.docx"),
///     "abc-123_ComplaintForm.pdf"
/// );
/// ```
pub fn output_filename(case_id: &str, template: &str) -> String {
    let stem = template.strip_suffix(".docx").unwrap_or(template);
    format!("{}_{}.pdf", case_id, stem)
}

/// Client for the document-merge API.
///
/// Public operations never return `Err`; every outcome lands in a
/// [`RenderResult`] so batches can carry per-item failures.
pub struct RenderClient {
    config: RenderConfig,
    transport: Arc<dyn Transport>,
}

impl RenderClient {
    /// Create a client using the production HTTP transport.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client with an injected transport.
    pub fn with_transport(config: RenderConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Whether an endpoint is set. Render attempts fail fast when it is not.
    /// The access key stays optional; open-access servers run without one.
    pub fn is_configured(&self) -> bool {
        !self.config.endpoint.is_empty()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one document.
    ///
    /// On success the result carries the document bytes and their size; on
    /// failure it carries the typed error instead. No network call is made
    /// when the endpoint is not configured.
    pub async fn render(&self, request: &RenderRequest) -> RenderResult {
        if !self.is_configured() {
            let err = PipelineError::NotConfigured {
                what: "render endpoint".to_string(),
            };
            error!(template = %request.template, error = %err, "document generation failed");
            return RenderResult::failed(&request.template, &request.output_name, err);
        }

        info!(
            template = %request.template,
            output = %request.output_name,
            "generating document"
        );

        let transport_request = TransportRequest {
            url: self.config.endpoint.clone(),
            headers: vec![("Accept".to_string(), "application/pdf".to_string())],
            body: RequestBody::Json(self.build_body(request)),
            timeout: self.config.timeout,
        };

        let mut on_retry = |attempt: u32, delay: Duration, reason: &str| {
            warn!(
                template = %request.template,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason,
                "retrying render request"
            );
        };

        let outcome = with_backoff(
            &self.transport,
            &transport_request,
            &self.config.backoff,
            Some(&mut on_retry),
        )
        .await;

        match outcome {
            Ok(response) => {
                let result = RenderResult::generated(
                    &request.template,
                    &request.output_name,
                    response.body,
                );
                info!(output = %result.filename, size = result.size, "document generated");
                result
            }
            Err(err) => {
                error!(
                    template = %request.template,
                    kind = err.kind(),
                    error = %err,
                    "document generation failed"
                );
                RenderResult::failed(&request.template, &request.output_name, err)
            }
        }
    }

    /// Render every template for one case, sequentially and in input order.
    ///
    /// Falls back to [`DEFAULT_TEMPLATES`] when `templates` is `None`.
    /// Output filenames follow [`output_filename`]. Per-template failures
    /// never abort the batch.
    pub async fn render_case_documents(
        &self,
        case_id: &str,
        case_data: &Value,
        templates: Option<&[String]>,
    ) -> RenderBatch {
        let defaults: Vec<String>;
        let templates: &[String] = match templates {
            Some(list) => list,
            None => {
                defaults = DEFAULT_TEMPLATES.iter().map(|s| s.to_string()).collect();
                &defaults
            }
        };

        info!(case_id = %case_id, count = templates.len(), "generating case documents");

        let mut batch = RenderBatch::default();
        for template in templates {
            let request = RenderRequest::new(template, output_filename(case_id, template))
                .with_data(case_data.clone());
            batch.push(self.render(&request).await);
        }

        info!(
            case_id = %case_id,
            successful = batch.successful,
            total = batch.total,
            "case document generation complete"
        );

        batch
    }

    /// Build the render request body. The access key rides in the body,
    /// not a header, and is omitted entirely when not configured.
    fn build_body(&self, request: &RenderRequest) -> Value {
        let mut body = json!({
            "templateName": request.template,
            "outputName": request.output_name,
            "outputFormat": request.format,
            "data": request.data,
        });
        if let Some(ref key) = self.config.access_key {
            debug!("including access key in request");
            body["accessKey"] = json!(key);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BackoffConfig, JitterStrategy, MockOutcome, MockTransport};
    use bytes::Bytes;
    use serde_json::json;

    fn fast_backoff(max_retries: u32) -> BackoffConfig {
        BackoffConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: JitterStrategy::None,
            ..BackoffConfig::standard()
        }
    }

    fn client_with(config: RenderConfig, mock: Arc<MockTransport>) -> RenderClient {
        RenderClient::with_transport(config, mock)
    }

    #[test]
    fn test_output_filename_strips_docx() {
        assert_eq!(
            output_filename("abc-123", "ComplaintForm.docx"),
            "abc-123_ComplaintForm.pdf"
        );
    }

    #[test]
    fn test_output_filename_keeps_other_extensions() {
        assert_eq!(
            output_filename("abc-123", "CoverSheet.odt"),
            "abc-123_CoverSheet.odt.pdf"
        );
        assert_eq!(output_filename("abc-123", "Notes"), "abc-123_Notes.pdf");
    }

    #[test]
    fn test_build_body_without_access_key() {
        let client = RenderClient::new(RenderConfig::new("https://render.example.com"));
        let request = RenderRequest::new("Form.docx", "out.pdf")
            .with_data(json!({"plaintiff": "Jane Roe"}));

        let body = client.build_body(&request);
        assert_eq!(body["templateName"], "Form.docx");
        assert_eq!(body["outputName"], "out.pdf");
        assert_eq!(body["outputFormat"], "pdf");
        assert_eq!(body["data"]["plaintiff"], "Jane Roe");
        assert!(body.get("accessKey").is_none());
    }

    #[test]
    fn test_build_body_with_access_key() {
        let client = RenderClient::new(
            RenderConfig::new("https://render.example.com").with_access_key("key-123"),
        );
        let request = RenderRequest::new("Form.docx", "out.pdf");

        let body = client.build_body(&request);
        assert_eq!(body["accessKey"], "key-123");
    }

    #[test]
    fn test_build_body_custom_format() {
        let client = RenderClient::new(RenderConfig::new("https://render.example.com"));
        let request = RenderRequest::new("Form.docx", "out.docx").with_format("docx");

        let body = client.build_body(&request);
        assert_eq!(body["outputFormat"], "docx");
    }

    #[tokio::test]
    async fn test_render_success() {
        let mock = Arc::new(MockTransport::ok(Bytes::from_static(b"%PDF-1.4 minimal")));
        let client = client_with(
            RenderConfig::new("https://render.example.com/api/render"),
            mock.clone(),
        );

        let request = RenderRequest::new("ComplaintForm.docx", "abc-123_ComplaintForm.pdf")
            .with_data(json!({"case": "abc-123"}));
        let result = client.render(&request).await;

        assert!(result.success);
        assert_eq!(result.document, Some(Bytes::from_static(b"%PDF-1.4 minimal")));
        assert_eq!(result.size, 16);
        assert_eq!(result.filename, "abc-123_ComplaintForm.pdf");
        assert_eq!(result.template, "ComplaintForm.docx");
        assert!(result.error.is_none());

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://render.example.com/api/render");
        assert!(seen[0]
            .headers
            .iter()
            .any(|(name, value)| name == "Accept" && value == "application/pdf"));
    }

    #[tokio::test]
    async fn test_render_unconfigured_makes_no_call() {
        let mock = Arc::new(MockTransport::ok(Bytes::new()));
        let client = client_with(RenderConfig::default(), mock.clone());

        let result = client
            .render(&RenderRequest::new("Form.docx", "out.pdf"))
            .await;

        assert!(!result.success);
        assert!(matches!(
            result.error,
            Some(PipelineError::NotConfigured { .. })
        ));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_rejection_carries_status_and_body() {
        let mock = Arc::new(MockTransport::failing(PipelineError::Rejected {
            status: 400,
            body: "unknown template".into(),
        }));
        let config = RenderConfig::new("https://render.example.com")
            .with_backoff(BackoffConfig::none());
        let client = client_with(config, mock);

        let result = client
            .render(&RenderRequest::new("Ghost.docx", "out.pdf"))
            .await;

        assert!(!result.success);
        let err = result.error.unwrap();
        assert_eq!(err.to_string(), "service returned 400: unknown template");
    }

    #[tokio::test]
    async fn test_render_request_carries_configured_timeout() {
        let mock = Arc::new(MockTransport::ok(Bytes::new()));
        let config = RenderConfig::new("https://render.example.com")
            .with_timeout(Duration::from_secs(7));
        let client = client_with(config, mock.clone());

        client
            .render(&RenderRequest::new("Form.docx", "out.pdf"))
            .await;

        assert_eq!(mock.requests()[0].timeout, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_render_retries_transient_failures() {
        let mock = Arc::new(MockTransport::new(vec![
            MockOutcome::Err(PipelineError::Rejected {
                status: 503,
                body: "overloaded".into(),
            }),
            MockOutcome::Ok(Bytes::from_static(b"pdf")),
        ]));
        let config = RenderConfig::new("https://render.example.com")
            .with_backoff(fast_backoff(3));
        let client = client_with(config, mock.clone());

        let result = client
            .render(&RenderRequest::new("Form.docx", "out.pdf"))
            .await;

        assert!(result.success);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_render_retry_attempts_bounded_by_config() {
        let mock = Arc::new(MockTransport::failing(PipelineError::Rejected {
            status: 500,
            body: "boom".into(),
        }));
        let config = RenderConfig::new("https://render.example.com")
            .with_backoff(fast_backoff(2));
        let client = client_with(config, mock.clone());

        let result = client
            .render(&RenderRequest::new("Form.docx", "out.pdf"))
            .await;

        assert!(!result.success);
        assert_eq!(mock.calls(), 3); // initial attempt + 2 retries
    }

    #[tokio::test]
    async fn test_render_case_documents_uses_default_templates() {
        let mock = Arc::new(MockTransport::ok(Bytes::from_static(b"doc")));
        let client = client_with(RenderConfig::new("https://render.example.com"), mock);

        let batch = client
            .render_case_documents("abc-123", &json!({"k": "v"}), None)
            .await;

        assert_eq!(batch.total, 3);
        assert_eq!(batch.successful, 3);
        assert_eq!(batch.failed, 0);
        assert_eq!(batch.documents[0].filename, "abc-123_ComplaintForm.pdf");
        assert_eq!(batch.documents[1].filename, "abc-123_DiscoveryRequest.pdf");
        assert_eq!(batch.documents[2].filename, "abc-123_SummonsForm.pdf");
    }

    #[tokio::test]
    async fn test_render_case_documents_partial_failure() {
        let mock = Arc::new(MockTransport::new(vec![
            MockOutcome::Ok(Bytes::from_static(b"one")),
            MockOutcome::Err(PipelineError::Timeout { timeout_secs: 60 }),
            MockOutcome::Ok(Bytes::from_static(b"three")),
        ]));
        let config = RenderConfig::new("https://render.example.com")
            .with_backoff(BackoffConfig::none());
        let client = client_with(config, mock);

        let templates: Vec<String> = vec![
            "A.docx".to_string(),
            "B.docx".to_string(),
            "C.docx".to_string(),
        ];
        let batch = client
            .render_case_documents("case-9", &json!({}), Some(&templates))
            .await;

        assert_eq!(batch.total, 3);
        assert_eq!(batch.successful, 2);
        assert_eq!(batch.failed, 1);
        assert!(batch.documents[0].success);
        assert!(!batch.documents[1].success);
        assert_eq!(
            batch.documents[1].error,
            Some(PipelineError::Timeout { timeout_secs: 60 })
        );
        assert!(batch.documents[2].success);
    }
}
