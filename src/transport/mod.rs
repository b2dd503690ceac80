//! Transport trait and normalized request/response types.
//!
//! The [`Transport`] trait abstracts the HTTP round trip shared by the
//! render and storage clients. Clients build a normalized
//! [`TransportRequest`]; the transport performs the POST and hands back the
//! successful response, converting every other outcome into a typed
//! [`PipelineError`](crate::PipelineError).
//!
//! ## Architecture
//!
//! ```text
//! RenderClient ──┐
//!                ├──► TransportRequest ──► Transport::execute() ──► TransportResponse
//! StorageClient ─┘                               │
//!                                     ┌──────────┴──────────┐
//!                                HttpTransport         MockTransport
//!                                reqwest POST          scripted outcomes
//! ```

pub mod backoff;
pub mod http;
pub mod mock;

pub use backoff::{BackoffConfig, JitterStrategy};
pub use http::HttpTransport;
pub use mock::{MockOutcome, MockTransport};

use crate::error::Result;
use crate::PipelineError;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Type alias for the callback invoked before each transport retry.
///
/// Arguments: `(attempt_number, delay_before_retry, reason_for_retry)`.
pub type RetryCallback<'a> = Option<&'a mut (dyn FnMut(u32, Duration, &str) + Send)>;

/// A normalized outbound request.
///
/// Everything is a POST: the render API takes JSON, the storage API takes
/// raw bytes with its metadata in headers.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Absolute URL to POST to.
    pub url: String,

    /// Additional headers as (name, value) pairs. Content-Type is implied
    /// by the body variant and must not appear here.
    pub headers: Vec<(String, String)>,

    /// Request body.
    pub body: RequestBody,

    /// Per-request deadline.
    pub timeout: Duration,
}

/// Body of a [`TransportRequest`].
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON payload, sent as `application/json`.
    Json(Value),
    /// Raw bytes, sent as `application/octet-stream`.
    Bytes(Bytes),
}

/// A completed response.
///
/// Only success statuses reach here; transports convert non-success
/// completions into [`PipelineError::Rejected`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Response body bytes.
    pub body: Bytes,
}

/// Abstraction over the HTTP round trip.
///
/// Built-in implementations: [`HttpTransport`] for production,
/// [`MockTransport`] for tests.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a single POST and return the successful response.
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Check whether a [`PipelineError`] is retryable under the backoff config.
///
/// Retryable conditions:
/// - [`PipelineError::Rejected`] with a status in `config.retryable_statuses`
/// - [`PipelineError::Timeout`] when `config.retry_on_timeout` is set
/// - [`PipelineError::Transport`] (connection-level failures)
pub fn is_retryable(error: &PipelineError, config: &BackoffConfig) -> bool {
    match error {
        PipelineError::Rejected { status, .. } => config.retryable_statuses.contains(status),
        PipelineError::Timeout { .. } => config.retry_on_timeout,
        PipelineError::Transport { .. } => true,
        _ => false,
    }
}

/// Execute a transport call with retry and exponential backoff.
///
/// Returns the first successful response, or the last error once the
/// configured attempts are exhausted. Non-retryable errors (4xx rejections,
/// configuration problems) are returned immediately.
///
/// # Arguments
///
/// * `transport` — the transport to call
/// * `request` — the normalized request, reused verbatim on each attempt
/// * `config` — backoff configuration
/// * `on_retry` — optional callback invoked before each retry with
///   (attempt, delay, reason)
pub async fn with_backoff(
    transport: &Arc<dyn Transport>,
    request: &TransportRequest,
    config: &BackoffConfig,
    mut on_retry: RetryCallback<'_>,
) -> Result<TransportResponse> {
    let mut last_error: Option<PipelineError> = None;

    for attempt in 0..=config.max_retries {
        // Wait for backoff delay (not on first attempt)
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            let reason = last_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();

            if let Some(ref mut cb) = on_retry {
                cb(attempt, delay, &reason);
            }

            tokio::time::sleep(delay).await;
        }

        match transport.execute(request).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                if attempt < config.max_retries && is_retryable(&e, config) {
                    last_error = Some(e);
                    continue;
                }
                return Err(e);
            }
        }
    }

    // Unreachable: the loop always returns from its final iteration
    Err(last_error.unwrap_or(PipelineError::Other {
        message: "backoff loop exited unexpectedly".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fast_backoff(max_retries: u32) -> BackoffConfig {
        BackoffConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            multiplier: 1.0,
            max_delay: Duration::from_millis(2),
            jitter: JitterStrategy::None,
            ..BackoffConfig::standard()
        }
    }

    fn test_request() -> TransportRequest {
        TransportRequest {
            url: "http://unused/render".to_string(),
            headers: vec![],
            body: RequestBody::Json(json!({"templateName": "Form.docx"})),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_is_retryable_server_errors() {
        let config = BackoffConfig::standard();
        let err = PipelineError::Rejected {
            status: 503,
            body: "service unavailable".into(),
        };
        assert!(is_retryable(&err, &config));

        let err = PipelineError::Rejected {
            status: 500,
            body: "internal error".into(),
        };
        assert!(is_retryable(&err, &config));
    }

    #[test]
    fn test_is_retryable_client_error_not_retried() {
        let config = BackoffConfig::standard();
        let err = PipelineError::Rejected {
            status: 400,
            body: "bad request".into(),
        };
        assert!(!is_retryable(&err, &config));
    }

    #[test]
    fn test_is_retryable_timeout_follows_flag() {
        let mut config = BackoffConfig::standard();
        let err = PipelineError::Timeout { timeout_secs: 60 };
        assert!(is_retryable(&err, &config));

        config.retry_on_timeout = false;
        assert!(!is_retryable(&err, &config));
    }

    #[test]
    fn test_is_retryable_transport_error() {
        let config = BackoffConfig::standard();
        let err = PipelineError::Transport {
            message: "connection refused".into(),
        };
        assert!(is_retryable(&err, &config));
    }

    #[test]
    fn test_is_retryable_domain_errors_not_retried() {
        let config = BackoffConfig::standard();
        assert!(!is_retryable(&PipelineError::UploadDisabled, &config));
        assert!(!is_retryable(
            &PipelineError::CaseNotFound {
                case_id: "abc".into()
            },
            &config
        ));
    }

    #[tokio::test]
    async fn test_with_backoff_recovers_after_transient_failure() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new(vec![
            MockOutcome::Err(PipelineError::Rejected {
                status: 503,
                body: "overloaded".into(),
            }),
            MockOutcome::Ok(Bytes::from_static(b"pdf bytes")),
        ]));

        let resp = with_backoff(&transport, &test_request(), &fast_backoff(3), None)
            .await
            .unwrap();

        assert_eq!(resp.body, Bytes::from_static(b"pdf bytes"));
    }

    #[tokio::test]
    async fn test_with_backoff_exhausts_attempts() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::failing(
            PipelineError::Timeout { timeout_secs: 5 },
        ));

        let err = with_backoff(&transport, &test_request(), &fast_backoff(2), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Timeout { timeout_secs: 5 }));
    }

    #[tokio::test]
    async fn test_with_backoff_call_count() {
        let mock = Arc::new(MockTransport::failing(PipelineError::Rejected {
            status: 500,
            body: "boom".into(),
        }));
        let transport: Arc<dyn Transport> = mock.clone();

        let result = with_backoff(&transport, &test_request(), &fast_backoff(2), None).await;

        assert!(result.is_err());
        assert_eq!(mock.calls(), 3); // initial attempt + 2 retries
    }

    #[tokio::test]
    async fn test_with_backoff_non_retryable_fails_fast() {
        let mock = Arc::new(MockTransport::failing(PipelineError::Rejected {
            status: 400,
            body: "bad template".into(),
        }));
        let transport: Arc<dyn Transport> = mock.clone();

        let err = with_backoff(&transport, &test_request(), &fast_backoff(3), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Rejected { status: 400, .. }));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_with_backoff_invokes_retry_callback() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new(vec![
            MockOutcome::Err(PipelineError::Transport {
                message: "reset by peer".into(),
            }),
            MockOutcome::Ok(Bytes::new()),
        ]));

        let mut seen: Vec<(u32, String)> = Vec::new();
        let mut cb = |attempt: u32, _delay: Duration, reason: &str| {
            seen.push((attempt, reason.to_string()));
        };

        with_backoff(&transport, &test_request(), &fast_backoff(3), Some(&mut cb))
            .await
            .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 1);
        assert!(seen[0].1.contains("reset by peer"));
    }

    #[tokio::test]
    async fn test_with_backoff_zero_retries_single_call() {
        let mock = Arc::new(MockTransport::failing(PipelineError::Rejected {
            status: 503,
            body: "down".into(),
        }));
        let transport: Arc<dyn Transport> = mock.clone();

        let result = with_backoff(
            &transport,
            &test_request(),
            &BackoffConfig::none(),
            None,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
