//! Example: running the full pipeline without live services.
//!
//! Run with: `cargo run --example mock_pipeline`

use doc_pipeline::config::{RenderConfig, UploadConfig};
use doc_pipeline::transport::MockTransport;
use doc_pipeline::{DocumentPipeline, InMemoryCaseData, RenderClient, StorageClient};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Case data that would normally come from the application database
    let provider = Arc::new(InMemoryCaseData::new().with_case(
        "case-2024-001",
        json!({
            "plaintiff": "Jane Roe",
            "defendant": "Acme Corp",
            "court": "Superior Court of Example County",
        }),
    ));

    // Script both services: the render mock answers every request with PDF
    // bytes, the storage mock acknowledges every upload
    let render_mock = Arc::new(MockTransport::ok(b"%PDF-1.4 mock document".as_slice()));
    let storage_mock = Arc::new(MockTransport::ok(b"{}".as_slice()));

    let pipeline = DocumentPipeline::new(
        RenderClient::with_transport(
            RenderConfig::new("https://render.example.com/api/render"),
            render_mock,
        ),
        StorageClient::with_transport(UploadConfig::new("mock-token"), storage_mock),
        provider,
    );

    let result = pipeline
        .generate_documents_for_case("case-2024-001", None, true)
        .await;

    println!("Case: {}", result.case_id);
    println!("Success: {}", result.success);
    println!(
        "Generated {} of {} documents:",
        result.documents_generated,
        result.documents.len()
    );
    for doc in &result.documents {
        println!("  {} ({} bytes)", doc.filename, doc.size);
    }

    println!("Uploaded {} documents:", result.documents_uploaded);
    for upload in &result.uploads {
        if let Some(ref path) = upload.path {
            println!("  {}", path);
        }
    }

    Ok(())
}
