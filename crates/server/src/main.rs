//! pricing-server binary
//!
//! Loads the tables once, then serves predictions until terminated.

use pricing_api::{JsonDirSource, PricePredictor, TableSource};
use pricing_server::{app, AppState, ServerConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads .env as well
    let config = ServerConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricing_server=info,tower_http=info".into()),
        )
        .init();

    let (tables, source) = match &config.tables_url {
        Some(url) => (
            pricing_core::fetch_tables(url, config.fetch_timeout).await?,
            format!("remote {}", url),
        ),
        None => {
            let source = JsonDirSource::new(&config.data_dir);
            let tables = source.load()?;
            (tables, format!("{} {}", source.name(), source.dir().display()))
        }
    };
    let predictor = PricePredictor::new(tables, config.evaluator)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = app(AppState::new(predictor, &source))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.addr()?;
    tracing::info!(%addr, %source, "pricing-server v{} listening", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
