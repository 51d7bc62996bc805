//! Predictor service
//!
//! Owns a shared, immutable copy of the tables together with the evaluator
//! configuration. Cheap to clone; safe to share across threads.

use std::sync::Arc;

use pricing_core::{generate_trend, months_between, trend_months, LinearEvaluator};
use pricing_spi::{
    CategoryOptions, PriceModel, PredictionRequest, PredictionResult, PricingError,
    PricingTables, Result, ScoringQuery, ScoringRow, TableSource, YearMonth,
};

use crate::config::EvaluatorConfig;

/// Price predictor over injected tables
#[derive(Debug, Clone)]
pub struct PricePredictor {
    tables: Arc<PricingTables>,
    config: EvaluatorConfig,
}

impl PricePredictor {
    /// Create a predictor; the configuration is validated first
    pub fn new(tables: impl Into<Arc<PricingTables>>, config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tables: tables.into(),
            config,
        })
    }

    /// Load tables from `source` and create a predictor
    pub fn from_source(source: &dyn TableSource, config: EvaluatorConfig) -> Result<Self> {
        Self::new(source.load()?, config)
    }

    /// Loaded tables
    pub fn tables(&self) -> &PricingTables {
        &self.tables
    }

    /// Active configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluator borrowing this predictor's tables
    pub fn evaluator(&self) -> LinearEvaluator<'_> {
        LinearEvaluator::new(&self.tables, self.config.settings())
    }

    /// Full-precision price for `request` at the `YYYY-MM` label `month`
    pub fn evaluate(&self, request: &PredictionRequest, month: &str) -> Result<f64> {
        let month: YearMonth = month
            .parse()
            .map_err(|_| PricingError::UnknownMonth(month.to_string()))?;
        self.evaluate_at(request, &month)
    }

    /// Full-precision price for `request` at `month`
    pub fn evaluate_at(&self, request: &PredictionRequest, month: &YearMonth) -> Result<f64> {
        self.evaluator().evaluate(request, month)
    }

    /// Months of the configured window
    pub fn window(&self) -> Result<Vec<YearMonth>> {
        trend_months(
            self.config.reference_month,
            self.config.window_size,
            self.config.window_policy,
        )
    }

    /// Trend over the configured window
    pub fn generate_trend(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let months = self.window()?;
        self.trend_for(request, &months)
    }

    /// Trend over `window_size` months around `reference_month`
    pub fn generate_trend_at(
        &self,
        request: &PredictionRequest,
        reference_month: YearMonth,
        window_size: usize,
    ) -> Result<PredictionResult> {
        let months = trend_months(reference_month, window_size, self.config.window_policy)?;
        self.trend_for(request, &months)
    }

    /// Trend over every month from `start` to `end`
    pub fn trend_between(
        &self,
        request: &PredictionRequest,
        start: YearMonth,
        end: YearMonth,
    ) -> Result<PredictionResult> {
        let months = months_between(start, end)?;
        self.trend_for(request, &months)
    }

    /// Trend for a scoring query; the configured window applies when the
    /// query carries no month range
    pub fn query(&self, query: &ScoringQuery) -> Result<PredictionResult> {
        let request = query.request();
        match (query.month_start, query.month_end) {
            (Some(start), Some(end)) => self.trend_between(&request, start, end),
            (None, None) => self.generate_trend(&request),
            _ => Err(PricingError::InvalidParameter {
                name: "month_start".to_string(),
                reason: "month_start and month_end must be given together".to_string(),
            }),
        }
    }

    /// Score positional rows for `model_id`, in row order
    pub fn score_rows(&self, model_id: &str, rows: &[ScoringRow]) -> Result<Vec<f64>> {
        let evaluator = self.evaluator();
        rows.iter()
            .map(|row| {
                let value = evaluator.evaluate(&row.request(model_id), &row.month())?;
                Ok(self.display(value))
            })
            .collect()
    }

    /// Option lists for a form layer
    pub fn options(&self) -> CategoryOptions {
        self.tables.options()
    }

    fn trend_for(
        &self,
        request: &PredictionRequest,
        months: &[YearMonth],
    ) -> Result<PredictionResult> {
        generate_trend(&self.evaluator(), request, months, self.config.round_to_cents)
    }

    fn display(&self, value: f64) -> f64 {
        if self.config.round_to_cents {
            pricing_core::round_cents(value)
        } else {
            value
        }
    }
}
