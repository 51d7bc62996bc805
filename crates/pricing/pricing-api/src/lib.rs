//! Pricing Consumer API
//!
//! Consumer configuration and the predictor service for linear resale
//! price models.
//!
//! This crate provides:
//! - [`EvaluatorConfig`] and its builder
//! - [`PricePredictor`], which owns loaded tables and serves predictions,
//!   trend series and option lists
//! - Re-exports from SPI and core for convenience

pub mod config;
pub mod predictor;

pub use config::{
    EvaluatorConfig, EvaluatorConfigBuilder, DEFAULT_REFERENCE_MONTH, DEFAULT_WINDOW_SIZE,
};
pub use predictor::PricePredictor;

// Re-export from core
pub use pricing_core::{
    evaluator, loader, round_cents, trend, EvaluationSettings, JsonDirSource, LinearEvaluator,
    StaticSource, TableDocuments, MAX_SERIES_MONTHS, MIN_LEASE_YEAR,
};

// Re-export from SPI
pub use pricing_spi::{
    BatchScoringRequest, BatchScoringResponse, CategoryKind, CategoryOptions, ClampPolicy,
    ModelCoefficients, PriceModel, PredictionRequest, PredictionResult, PricingError,
    PricingTables, Result, ScoringQuery, ScoringResponse, ScoringRow, TableSource, TrendPoint,
    WindowPolicy, YearMonth,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{EvaluatorConfig, EvaluatorConfigBuilder, PricePredictor};
    pub use pricing_core::{JsonDirSource, StaticSource};
    pub use pricing_spi::{
        ClampPolicy, PriceModel, PredictionRequest, PredictionResult, PricingError, Result,
        TableSource, WindowPolicy, YearMonth,
    };
}
