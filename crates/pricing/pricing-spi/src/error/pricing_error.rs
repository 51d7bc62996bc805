//! Pricing error types

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorical feature whose lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Town one-hot offset
    Town,
    /// Flat model one-hot offset
    FlatModel,
    /// Storey range ordinal rank
    StoreyRange,
}

impl CategoryKind {
    /// Field name as it appears in requests
    pub fn field_name(&self) -> &'static str {
        match self {
            CategoryKind::Town => "town",
            CategoryKind::FlatModel => "flat_model",
            CategoryKind::StoreyRange => "storey_range",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Errors that can occur while loading tables or evaluating a price
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Model id is not present in the coefficient table
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Categorical value has no entry in its mapping
    #[error("Unknown {kind}: {value}")]
    UnknownCategory { kind: CategoryKind, value: String },

    /// Month is not present in the month ordinal table
    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    /// Floor area must be finite and strictly positive
    #[error("Invalid floor area: {0} (must be greater than 0)")]
    InvalidFloorArea(f64),

    /// Lease commencement year outside the accepted range
    #[error("Invalid lease commence year: {year} (must be between {min} and {max})")]
    InvalidLeaseYear { year: i32, min: i32, max: i32 },

    /// Tables could not be loaded or a remote collaborator failed
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// Tables loaded but violate a consistency rule
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl PricingError {
    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::UnknownModel(_) => "unknown_model",
            PricingError::UnknownCategory { .. } => "unknown_category",
            PricingError::UnknownMonth(_) => "unknown_month",
            PricingError::InvalidFloorArea(_) => "invalid_floor_area",
            PricingError::InvalidLeaseYear { .. } => "invalid_lease_year",
            PricingError::DataSourceUnavailable(_) => "data_source_unavailable",
            PricingError::InvalidTable(_) => "invalid_table",
            PricingError::InvalidParameter { .. } => "invalid_parameter",
        }
    }

    /// Whether the error was caused by the caller's input rather than the tables
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            PricingError::DataSourceUnavailable(_) | PricingError::InvalidTable(_)
        )
    }

    pub(crate) fn unknown_category(kind: CategoryKind, value: &str) -> Self {
        PricingError::UnknownCategory {
            kind,
            value: value.to_string(),
        }
    }
}
