//! Example: generate and deliver every document for a case, configured
//! from the environment.
//!
//! Requires `DOCMOSIS_API_URL` (and usually `DOCMOSIS_ACCESS_KEY`). Set
//! `DROPBOX_ENABLED=true` and `DROPBOX_ACCESS_TOKEN` to deliver the
//! results; otherwise the pipeline renders and skips delivery.
//!
//! Run with: `cargo run --example render_case -- <case-id>`

use doc_pipeline::config::{RenderConfig, UploadConfig};
use doc_pipeline::{DocumentPipeline, InMemoryCaseData, RenderClient, StorageClient};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let case_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "case-2024-001".to_string());

    // Stand-in provider; a real deployment implements CaseDataProvider
    // against its database
    let data = json!({
        "case_id": case_id.clone(),
        "plaintiff": "Jane Roe",
        "defendant": "Acme Corp",
        "filing_date": "2024-06-12",
    });
    let provider = Arc::new(InMemoryCaseData::new().with_case(case_id.clone(), data));

    let render = RenderClient::new(RenderConfig::from_env());
    if !render.is_configured() {
        return Err("DOCMOSIS_API_URL is not set".into());
    }

    let pipeline = DocumentPipeline::new(
        render,
        StorageClient::new(UploadConfig::from_env()),
        provider,
    );

    let result = pipeline
        .generate_documents_for_case(&case_id, None, true)
        .await;

    println!(
        "case {}: {} generated, {} uploaded",
        result.case_id, result.documents_generated, result.documents_uploaded
    );
    for doc in &result.documents {
        match &doc.error {
            None => println!("  + {} ({} bytes)", doc.filename, doc.size),
            Some(err) => println!("  - {}: {}", doc.filename, err),
        }
    }
    for upload in &result.uploads {
        match (&upload.path, &upload.error) {
            (Some(path), _) => println!("  stored {}", path),
            (None, Some(err)) => println!(
                "  not stored {}: {}",
                upload.filename.as_deref().unwrap_or("?"),
                err
            ),
            (None, None) => {}
        }
    }

    if let Some(err) = &result.error {
        return Err(format!("pipeline failed: {err}").into());
    }

    Ok(())
}
