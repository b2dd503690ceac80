//! # Document Pipeline
//!
//! Document generation and delivery for case files.
//!
//! This crate provides the building blocks for producing case documents:
//! a **render client** that merges case data into templates over a render
//! API, a **storage client** that delivers the results to cloud storage,
//! and a **pipeline** that sequences the two behind a case-data lookup.
//!
//! Serving layers (HTTP routes, job queues, schedulers) stay outside. This
//! crate provides what runs *inside* a generation request: every outcome
//! lands in a result struct rather than an `Err`, so callers report status
//! without their own catch layer.
//!
//! ## Core Concepts
//!
//! - **[`DocumentPipeline`]** — orchestrator: fetch case data, render each
//!   template, upload the successful documents best-effort.
//! - **[`RenderClient`]** — document-merge API client. Transient failures
//!   retry with exponential backoff per [`BackoffConfig`].
//! - **[`StorageClient`]** — content-upload client. Disabled or
//!   unconfigured clients fail fast without touching the network.
//! - **[`CaseDataProvider`]** — object-safe trait supplying the merge data
//!   for a case.
//! - **[`Transport`]** — the HTTP seam shared by both clients; swap in
//!   [`MockTransport`] for tests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use doc_pipeline::config::{RenderConfig, UploadConfig};
//! use doc_pipeline::{DocumentPipeline, InMemoryCaseData, RenderClient, StorageClient};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(
//!         InMemoryCaseData::new().with_case("abc-123", json!({"plaintiff": "Jane Roe"})),
//!     );
//!
//!     let pipeline = DocumentPipeline::new(
//!         RenderClient::new(RenderConfig::from_env()),
//!         StorageClient::new(UploadConfig::from_env()),
//!         provider,
//!     );
//!
//!     let result = pipeline
//!         .generate_documents_for_case("abc-123", None, true)
//!         .await;
//!     println!(
//!         "case {}: {} generated, {} uploaded",
//!         result.case_id, result.documents_generated, result.documents_uploaded
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Testing Without Live Services
//!
//! Both clients accept an injected transport, so tests script outcomes
//! instead of standing up a render server or storage account:
//!
//! ```
//! use doc_pipeline::config::RenderConfig;
//! use doc_pipeline::transport::MockTransport;
//! use doc_pipeline::{RenderClient, RenderRequest};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = Arc::new(MockTransport::ok(b"%PDF-1.4 fake".as_slice()));
//! let client = RenderClient::with_transport(
//!     RenderConfig::new("https://render.example.com/api/render"),
//!     mock,
//! );
//!
//! let result = client
//!     .render(&RenderRequest::new("ComplaintForm.docx", "abc-123_ComplaintForm.pdf"))
//!     .await;
//! assert!(result.success);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod storage;
pub mod transport;
pub mod types;

// --- Primary exports ---
pub use pipeline::DocumentPipeline;
pub use provider::{CaseDataProvider, InMemoryCaseData};
pub use render::{output_filename, RenderClient, RenderRequest, DEFAULT_TEMPLATES};
pub use storage::{join_storage_path, StorageClient, UploadRequest};

// --- Configuration and transport ---
pub use config::{RenderConfig, UploadConfig};
pub use transport::{BackoffConfig, HttpTransport, MockTransport, Transport};

// --- Results and errors ---
pub use error::{PipelineError, Result};
pub use types::{PipelineResult, RenderBatch, RenderResult, UploadBatch, UploadResult};
