//! Prediction request model

use serde::{Deserialize, Serialize};

/// Attributes of one flat, fixed for every month of a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Key into the coefficient table
    #[serde(alias = "ml_model")]
    pub model_id: String,
    /// Town name, e.g. `ANG MO KIO`
    pub town: String,
    /// Storey range label, e.g. `01 TO 03`
    pub storey_range: String,
    /// Flat model name, e.g. `Improved`
    pub flat_model: String,
    /// Floor area in square metres
    pub floor_area_sqm: f64,
    /// Year the 99-year lease commenced
    #[serde(alias = "lease_commence_date")]
    pub lease_commence_year: i32,
}

impl PredictionRequest {
    /// Create a new request
    pub fn new(
        model_id: &str,
        town: &str,
        storey_range: &str,
        flat_model: &str,
        floor_area_sqm: f64,
        lease_commence_year: i32,
    ) -> Self {
        Self {
            model_id: model_id.to_string(),
            town: town.to_string(),
            storey_range: storey_range.to_string(),
            flat_model: flat_model.to_string(),
            floor_area_sqm,
            lease_commence_year,
        }
    }

    /// Same request with a different floor area
    pub fn with_floor_area(mut self, floor_area_sqm: f64) -> Self {
        self.floor_area_sqm = floor_area_sqm;
        self
    }

    /// Same request with a different lease commencement year
    pub fn with_lease_year(mut self, lease_commence_year: i32) -> Self {
        self.lease_commence_year = lease_commence_year;
        self
    }
}
