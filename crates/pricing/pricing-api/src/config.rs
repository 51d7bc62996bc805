//! Evaluator configuration types.

use pricing_core::{EvaluationSettings, MAX_SERIES_MONTHS, MIN_LEASE_YEAR};
use pricing_spi::{ClampPolicy, PricingError, Result, WindowPolicy, YearMonth};
use serde::{Deserialize, Serialize};

/// Last month covered by the published month table
pub const DEFAULT_REFERENCE_MONTH: &str = "2022-02";

/// Twelve months back plus the reference month
pub const DEFAULT_WINDOW_SIZE: usize = 13;

fn default_reference_month() -> YearMonth {
    YearMonth::new(2022, 2).unwrap_or_else(|| unreachable!("2022-02 is a valid month"))
}

/// How predictions and trend series are produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Month the trend window is anchored on
    pub reference_month: YearMonth,
    /// Number of months in a trend series
    pub window_size: usize,
    /// Placement of the window relative to the reference month
    pub window_policy: WindowPolicy,
    /// Negative result handling
    pub clamp: ClampPolicy,
    /// Round series values to cents
    pub round_to_cents: bool,
    /// Earliest accepted lease commencement year, never before 1960
    pub min_lease_year: i32,
    /// Latest accepted lease commencement year, never after the reference
    /// year (the reference year when unset)
    pub max_lease_year: Option<i32>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            reference_month: default_reference_month(),
            window_size: DEFAULT_WINDOW_SIZE,
            window_policy: WindowPolicy::Trailing,
            clamp: ClampPolicy::FloorAtZero,
            round_to_cents: true,
            min_lease_year: MIN_LEASE_YEAR,
            max_lease_year: None,
        }
    }
}

impl EvaluatorConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > MAX_SERIES_MONTHS {
            return Err(PricingError::InvalidParameter {
                name: "window_size".to_string(),
                reason: format!("must be between 1 and {}", MAX_SERIES_MONTHS),
            });
        }
        if self.min_lease_year < MIN_LEASE_YEAR {
            return Err(PricingError::InvalidParameter {
                name: "min_lease_year".to_string(),
                reason: format!("{} is before {}", self.min_lease_year, MIN_LEASE_YEAR),
            });
        }
        if let Some(max) = self.max_lease_year {
            if max > self.reference_month.year() {
                return Err(PricingError::InvalidParameter {
                    name: "max_lease_year".to_string(),
                    reason: format!(
                        "{} is after the reference year {}",
                        max,
                        self.reference_month.year()
                    ),
                });
            }
        }
        if self.min_lease_year > self.latest_lease_year() {
            return Err(PricingError::InvalidParameter {
                name: "min_lease_year".to_string(),
                reason: format!(
                    "{} is after the latest lease year {}",
                    self.min_lease_year,
                    self.latest_lease_year()
                ),
            });
        }
        Ok(())
    }

    /// Effective latest lease year
    pub fn latest_lease_year(&self) -> i32 {
        self.max_lease_year
            .unwrap_or_else(|| self.reference_month.year())
    }

    /// Settings handed to the evaluator
    pub fn settings(&self) -> EvaluationSettings {
        EvaluationSettings {
            clamp: self.clamp,
            min_lease_year: self.min_lease_year,
            max_lease_year: self.latest_lease_year(),
        }
    }
}

/// Builder for EvaluatorConfig.
#[derive(Debug, Default)]
pub struct EvaluatorConfigBuilder {
    reference_month: Option<YearMonth>,
    window_size: Option<usize>,
    window_policy: Option<WindowPolicy>,
    clamp: Option<ClampPolicy>,
    round_to_cents: Option<bool>,
    min_lease_year: Option<i32>,
    max_lease_year: Option<i32>,
}

impl EvaluatorConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference month.
    pub fn reference_month(mut self, month: YearMonth) -> Self {
        self.reference_month = Some(month);
        self
    }

    /// Set the window size.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Set the window policy.
    pub fn window_policy(mut self, policy: WindowPolicy) -> Self {
        self.window_policy = Some(policy);
        self
    }

    /// Set the clamp policy.
    pub fn clamp(mut self, clamp: ClampPolicy) -> Self {
        self.clamp = Some(clamp);
        self
    }

    /// Enable or disable rounding to cents.
    pub fn round_to_cents(mut self, round: bool) -> Self {
        self.round_to_cents = Some(round);
        self
    }

    /// Set the accepted lease year range.
    pub fn lease_years(mut self, min: i32, max: i32) -> Self {
        self.min_lease_year = Some(min);
        self.max_lease_year = Some(max);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<EvaluatorConfig> {
        let defaults = EvaluatorConfig::default();
        let config = EvaluatorConfig {
            reference_month: self.reference_month.unwrap_or(defaults.reference_month),
            window_size: self.window_size.unwrap_or(defaults.window_size),
            window_policy: self.window_policy.unwrap_or(defaults.window_policy),
            clamp: self.clamp.unwrap_or(defaults.clamp),
            round_to_cents: self.round_to_cents.unwrap_or(defaults.round_to_cents),
            min_lease_year: self.min_lease_year.unwrap_or(defaults.min_lease_year),
            max_lease_year: self.max_lease_year,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.reference_month.to_string(), DEFAULT_REFERENCE_MONTH);
        assert_eq!(config.window_size, 13);
        assert_eq!(config.window_policy, WindowPolicy::Trailing);
        assert_eq!(config.clamp, ClampPolicy::FloorAtZero);
        assert!(config.round_to_cents);
        assert_eq!(config.latest_lease_year(), 2022);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_follow_reference_year() {
        let config = EvaluatorConfigBuilder::new()
            .reference_month(YearMonth::new(2019, 6).unwrap())
            .build()
            .unwrap();
        let settings = config.settings();
        assert_eq!(settings.min_lease_year, 1960);
        assert_eq!(settings.max_lease_year, 2019);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EvaluatorConfigBuilder::new()
            .window_size(12)
            .window_policy(WindowPolicy::Preceding)
            .clamp(ClampPolicy::Unclamped)
            .round_to_cents(false)
            .lease_years(1970, 2020)
            .build()
            .unwrap();

        assert_eq!(config.window_size, 12);
        assert_eq!(config.window_policy, WindowPolicy::Preceding);
        assert_eq!(config.clamp, ClampPolicy::Unclamped);
        assert!(!config.round_to_cents);
        assert_eq!(config.settings().min_lease_year, 1970);
        assert_eq!(config.settings().max_lease_year, 2020);
    }

    #[test]
    fn test_builder_rejects_zero_window() {
        let result = EvaluatorConfigBuilder::new().window_size(0).build();
        assert!(matches!(result, Err(PricingError::InvalidParameter { .. })));
    }

    #[test]
    fn test_builder_rejects_inverted_lease_range() {
        let result = EvaluatorConfigBuilder::new().lease_years(2000, 1990).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_lease_bounds_stay_within_accepted_range() {
        let early = EvaluatorConfigBuilder::new().lease_years(1950, 2000).build();
        assert!(matches!(
            early,
            Err(PricingError::InvalidParameter { ref name, .. }) if name == "min_lease_year"
        ));

        let late = EvaluatorConfigBuilder::new().lease_years(1960, 2023).build();
        assert!(matches!(
            late,
            Err(PricingError::InvalidParameter { ref name, .. }) if name == "max_lease_year"
        ));

        let edges = EvaluatorConfigBuilder::new().lease_years(1960, 2022).build().unwrap();
        assert_eq!(edges.settings().max_lease_year, 2022);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: EvaluatorConfig =
            serde_json::from_str(r#"{"window_size": 12, "window_policy": "preceding"}"#).unwrap();
        assert_eq!(config.window_size, 12);
        assert_eq!(config.window_policy, WindowPolicy::Preceding);
        assert_eq!(config.reference_month.to_string(), "2022-02");
    }
}
