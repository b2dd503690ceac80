//! Production transport backed by `reqwest`.

use super::{RequestBody, Transport, TransportRequest, TransportResponse};
use crate::error::Result;
use crate::PipelineError;
use async_trait::async_trait;
use reqwest::Client;

/// Maximum length of an error body kept in results and logs.
const BODY_SNIPPET_LEN: usize = 200;

/// Transport that performs real HTTP POSTs.
///
/// Holds a shared [`reqwest::Client`] (cheap to clone, pools connections
/// internally), so one instance can serve both the render and storage
/// clients. The deadline comes from each [`TransportRequest`], not from the
/// client, because the two services run under different timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Wrap a caller-provided client (custom TLS, proxy settings).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.post(&request.url).timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match &request.body {
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Bytes(bytes) => builder
                .header("Content-Type", "application/octet-stream")
                .body(bytes.clone()),
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| classify(e, request.timeout.as_secs()))?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Rejected {
                status,
                body: snippet(&text),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| classify(e, request.timeout.as_secs()))?;

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Map a [`reqwest::Error`] to the typed error the clients report.
fn classify(err: reqwest::Error, timeout_secs: u64) -> PipelineError {
    if err.is_timeout() {
        PipelineError::Timeout { timeout_secs }
    } else {
        PipelineError::Transport {
            message: err.to_string(),
        }
    }
}

/// Truncate an error body to a bounded, char-boundary-safe snippet.
fn snippet(text: &str) -> String {
    if text.chars().count() <= BODY_SNIPPET_LEN {
        text.to_string()
    } else {
        let head: String = text.chars().take(BODY_SNIPPET_LEN).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_short_body_unchanged() {
        assert_eq!(snippet("template not found"), "template not found");
    }

    #[test]
    fn test_snippet_truncates_long_body() {
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert_eq!(s.len(), BODY_SNIPPET_LEN + 3);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let long = "é".repeat(300);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), BODY_SNIPPET_LEN + 3);
    }
}
