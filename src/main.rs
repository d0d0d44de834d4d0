mod extractor;
mod models;
mod server;

use extractor::{ExtractionService, ExtractorConfig};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🌾 Rural Scout - Listing Extractor");
    info!("===================================");
    info!("");

    let config = ExtractorConfig::from_env()?;
    let service = Arc::new(ExtractionService::new(config)?);

    // With a URL argument, run a one-shot extraction; otherwise serve the
    // extraction endpoint over HTTP.
    match std::env::args().nth(1) {
        Some(url) => run_once(&service, &url).await,
        None => {
            let addr =
                std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            server::serve(listener, service).await
        }
    }
}

async fn run_once(service: &ExtractionService, url: &str) -> anyhow::Result<()> {
    info!("Extracting candidate listings from {}", url);
    info!("This sends the page through the model for structured extraction");
    info!("");

    let outcome = service.scrape_url(url).await;
    let Some(properties) = outcome.properties else {
        anyhow::bail!(outcome
            .error
            .unwrap_or_else(|| "extraction failed".to_string()));
    };

    info!("\n✅ Extracted {} candidate records\n", properties.len());

    for (i, property) in properties.iter().enumerate() {
        let price = if property.price.is_empty() {
            "no price listed"
        } else {
            property.price.as_str()
        };
        println!("{}. {} ({})", i + 1, property.name, price);
        if !property.location.is_empty() {
            println!("   Location: {}", property.location);
        }
        if !property.activities.is_empty() {
            println!("   Activities: {}", property.activities.join(", "));
        }
        if !property.amenities.is_empty() {
            println!("   Amenities: {}", property.amenities.join(", "));
        }
        if !property.contact.website.is_empty() {
            println!("   Website: {}", property.contact.website);
        }
        println!();
    }

    // Save candidate records for the import review step
    let json = serde_json::to_string_pretty(&properties)?;
    tokio::fs::write("extracted_properties.json", json).await?;
    info!("💾 Saved candidate records to extracted_properties.json");

    Ok(())
}
