//! Linear model coefficient row

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CategoryKind, PricingError, Result};

/// Regression weights for one model id.
///
/// Field names on the wire follow the feature names the models were fit on,
/// so a `ml_model.json` `mapping` object deserializes directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
    /// Constant term
    pub intercept: f64,
    /// Multiplies the month ordinal
    #[serde(rename = "month")]
    pub month_coefficient: f64,
    /// Multiplies the floor area in square metres
    #[serde(rename = "floor_area_sqm")]
    pub floor_area_coefficient: f64,
    /// Multiplies the lease commencement year
    #[serde(rename = "lease_commence_date")]
    pub lease_year_coefficient: f64,
    /// Multiplies the storey range rank
    #[serde(rename = "storey_range")]
    pub storey_range_coefficient: f64,
    /// One-hot offset per town
    #[serde(rename = "town")]
    pub town_offsets: BTreeMap<String, f64>,
    /// One-hot offset per flat model
    #[serde(rename = "flat_model")]
    pub flat_model_offsets: BTreeMap<String, f64>,
}

impl ModelCoefficients {
    /// Offset applied for `town`
    pub fn town_offset(&self, town: &str) -> Result<f64> {
        self.town_offsets
            .get(town)
            .copied()
            .ok_or_else(|| PricingError::unknown_category(CategoryKind::Town, town))
    }

    /// Offset applied for `flat_model`
    pub fn flat_model_offset(&self, flat_model: &str) -> Result<f64> {
        self.flat_model_offsets
            .get(flat_model)
            .copied()
            .ok_or_else(|| PricingError::unknown_category(CategoryKind::FlatModel, flat_model))
    }
}
