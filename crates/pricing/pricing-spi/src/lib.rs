//! Pricing Service Provider Interface
//!
//! Data model, error taxonomy and contracts for evaluating linear resale
//! price models over categorical flat attributes.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{PriceModel, TableSource};
pub use error::{CategoryKind, PricingError, Result};
pub use model::{
    BatchScoringRequest, BatchScoringResponse, CategoryOptions, ClampPolicy, ModelCoefficients,
    MonthOrdinalTable, PredictionRequest, PredictionResult, PricingTables, ScoringQuery,
    ScoringResponse, ScoringRow, StoreyRangeTable, TrendPoint, WindowPolicy, YearMonth,
};
