//! Pricing Core
//!
//! Implementations of the linear price evaluator, trend series generation
//! and table loading. The `remote` feature adds a client for external
//! scoring endpoints.

pub mod evaluator;
pub mod loader;
pub mod trend;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export SPI items for implementations
pub use pricing_spi::{
    PriceModel, PredictionRequest, PredictionResult, PricingError, PricingTables, Result,
    TableSource, YearMonth,
};

// Re-export main types
pub use evaluator::{evaluate, round_cents, EvaluationSettings, LinearEvaluator, MIN_LEASE_YEAR};
pub use loader::{parse_tables, render_tables, JsonDirSource, StaticSource, TableDocuments};
pub use trend::{generate_trend, months_between, trend_months, MAX_SERIES_MONTHS};

#[cfg(feature = "remote")]
pub use remote::{fetch_tables, fetch_tables_with, RemoteScorer, WireFormat};
