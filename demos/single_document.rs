//! Example: render one document for a case and write it to disk.
//!
//! Requires `DOCMOSIS_API_URL` (and usually `DOCMOSIS_ACCESS_KEY`).
//!
//! Run with: `cargo run --example single_document`

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

    let provider = Arc::new(InMemoryCaseData::new().with_case(
        "case-2024-001",
        json!({
            "plaintiff": "Jane Roe",
            "defendant": "Acme Corp",
        }),
    ));

    let pipeline = DocumentPipeline::new(
        RenderClient::new(RenderConfig::from_env()),
        StorageClient::new(UploadConfig::disabled()),
        provider,
    );

    let result = pipeline
        .generate_single_document("case-2024-001", "ComplaintForm.docx", false)
        .await;

    println!("template: {}", result.template);
    println!("output:   {}", result.filename);
    match &result.error {
        Some(err) => println!("failed:   {}", err),
        None => println!("size:     {} bytes", result.size),
    }

    if let Some(doc) = &result.document {
        std::fs::write(&result.filename, doc)?;
        println!("wrote {}", result.filename);
    }

    Ok(())
}
