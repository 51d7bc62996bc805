//! Trend example: load tables, print a 13-month series
//!
//! Run with: cargo run --example trend -p pricing-facade
//!
//! Set `PRICING_SCORER_URL` to also score the same request on a running
//! pricing server and compare.

use std::time::Duration;

use pricing_facade::prelude::*;
use pricing_facade::{RemoteScorer, WireFormat};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== Resale Price Trend ===\n");

    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../data");
    let predictor = PricePredictor::from_source(&JsonDirSource::new(data_dir), EvaluatorConfig::default())?;

    let request = PredictionRequest::new(
        "Linear Regression",
        "ANG MO KIO",
        "07 TO 09",
        "Improved",
        67.0,
        1979,
    );
    println!("Request: {:?}\n", request);

    let local = predictor.generate_trend(&request)?;
    for point in local.points() {
        println!("   {}  {:>12.2}", point.label, point.data);
    }

    if let Ok(url) = std::env::var("PRICING_SCORER_URL") {
        println!("\nRemote scorer at {}", url);
        let scorer = RemoteScorer::new(&url, WireFormat::Json, Duration::from_secs(10))?;
        let remote = scorer.score(&request, &predictor.window()?).await?;
        let matches = remote == local;
        println!("   {} points, identical to local: {}", remote.len(), matches);
    }

    Ok(())
}
