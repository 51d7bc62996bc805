//! Post-processing and windowing policies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// What happens to a negative linear result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Floor at zero; a price can never be negative
    #[default]
    FloorAtZero,
    /// Return the raw linear result
    Unclamped,
}

impl ClampPolicy {
    /// Apply the policy to a raw result
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            ClampPolicy::FloorAtZero => value.max(0.0),
            ClampPolicy::Unclamped => value,
        }
    }
}

impl FromStr for ClampPolicy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor_at_zero" | "clamp" | "zero" => Ok(ClampPolicy::FloorAtZero),
            "unclamped" | "none" | "raw" => Ok(ClampPolicy::Unclamped),
            other => Err(PricingError::InvalidParameter {
                name: "clamp".to_string(),
                reason: format!("unknown clamp policy '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ClampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClampPolicy::FloorAtZero => f.write_str("floor_at_zero"),
            ClampPolicy::Unclamped => f.write_str("unclamped"),
        }
    }
}

/// Where a trend window sits relative to the reference month.
///
/// Every policy yields consecutive months in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Ends at and includes the reference month
    #[default]
    Trailing,
    /// The months strictly before the reference month
    Preceding,
    /// Starts at and includes the reference month
    Forward,
}

impl WindowPolicy {
    /// Offset in months of the first window entry from the reference month
    pub fn start_offset(&self, window_size: usize) -> i64 {
        let n = window_size as i64;
        match self {
            WindowPolicy::Trailing => 1 - n,
            WindowPolicy::Preceding => -n,
            WindowPolicy::Forward => 0,
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trailing" => Ok(WindowPolicy::Trailing),
            "preceding" => Ok(WindowPolicy::Preceding),
            "forward" => Ok(WindowPolicy::Forward),
            other => Err(PricingError::InvalidParameter {
                name: "window_policy".to_string(),
                reason: format!("unknown window policy '{}'", other),
            }),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPolicy::Trailing => f.write_str("trailing"),
            WindowPolicy::Preceding => f.write_str("preceding"),
            WindowPolicy::Forward => f.write_str("forward"),
        }
    }
}
