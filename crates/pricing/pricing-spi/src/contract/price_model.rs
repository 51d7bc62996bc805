//! Trait for single-month price evaluation

use crate::error::Result;
use crate::model::{PredictionRequest, YearMonth};

/// Computes the price of one flat for one calendar month.
///
/// Implementations must be pure: identical inputs give identical output.
pub trait PriceModel: Send + Sync {
    /// Price estimate for `request` at `month`
    fn evaluate(&self, request: &PredictionRequest, month: &YearMonth) -> Result<f64>;
}
