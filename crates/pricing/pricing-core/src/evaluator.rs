//! Linear model evaluation
//!
//! Computes a price from one coefficient row:
//!
//! ```text
//! price = intercept
//!       + month_ordinal[month] * month
//!       + town[town]
//!       + storey_rank[storey_range] * storey_range
//!       + floor_area_sqm * floor_area_sqm
//!       + flat_model[flat_model]
//!       + lease_commence_year * lease_commence_date
//! ```
//!
//! Categorical features are either one-hot offsets (town, flat model) or an
//! ordinal rank times a slope (storey range, month). Evaluation is pure and
//! all-or-nothing: any missing lookup or out-of-range input is an error.

use pricing_spi::{
    ClampPolicy, PriceModel, PredictionRequest, PricingError, PricingTables, Result, YearMonth,
};

/// First year HDB flats were leased
pub const MIN_LEASE_YEAR: i32 = 1960;

/// Validation bounds and post-processing applied by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationSettings {
    /// Negative result handling
    pub clamp: ClampPolicy,
    /// Earliest accepted lease commencement year
    pub min_lease_year: i32,
    /// Latest accepted lease commencement year
    pub max_lease_year: i32,
}

impl EvaluationSettings {
    /// Settings accepting lease years up to the reference month's year
    pub fn for_reference(reference: YearMonth, clamp: ClampPolicy) -> Self {
        Self {
            clamp,
            min_lease_year: MIN_LEASE_YEAR,
            max_lease_year: reference.year(),
        }
    }

    fn check_lease_year(&self, year: i32) -> Result<()> {
        if year < self.min_lease_year || year > self.max_lease_year {
            return Err(PricingError::InvalidLeaseYear {
                year,
                min: self.min_lease_year,
                max: self.max_lease_year,
            });
        }
        Ok(())
    }
}

/// Evaluate the linear model for `request` at `month`.
///
/// Returns full precision after the clamp policy; use [`round_cents`] for
/// display.
pub fn evaluate(
    tables: &PricingTables,
    settings: &EvaluationSettings,
    request: &PredictionRequest,
    month: &YearMonth,
) -> Result<f64> {
    let coef = tables.model(&request.model_id)?;

    if !(request.floor_area_sqm.is_finite() && request.floor_area_sqm > 0.0) {
        return Err(PricingError::InvalidFloorArea(request.floor_area_sqm));
    }
    settings.check_lease_year(request.lease_commence_year)?;

    let town_offset = coef.town_offset(&request.town)?;
    let storey_rank = tables.storey_ranges().rank(&request.storey_range)?;
    let flat_model_offset = coef.flat_model_offset(&request.flat_model)?;
    let month_ordinal = tables.months().ordinal(month)?;

    let raw = coef.intercept
        + month_ordinal as f64 * coef.month_coefficient
        + town_offset
        + storey_rank as f64 * coef.storey_range_coefficient
        + request.floor_area_sqm * coef.floor_area_coefficient
        + flat_model_offset
        + f64::from(request.lease_commence_year) * coef.lease_year_coefficient;

    Ok(settings.clamp.apply(raw))
}

/// Round to cents, halves rounding up
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// [`PriceModel`] over borrowed tables
#[derive(Debug, Clone, Copy)]
pub struct LinearEvaluator<'a> {
    tables: &'a PricingTables,
    settings: EvaluationSettings,
}

impl<'a> LinearEvaluator<'a> {
    /// Create an evaluator over `tables`
    pub fn new(tables: &'a PricingTables, settings: EvaluationSettings) -> Self {
        Self { tables, settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }
}

impl PriceModel for LinearEvaluator<'_> {
    fn evaluate(&self, request: &PredictionRequest, month: &YearMonth) -> Result<f64> {
        evaluate(self.tables, &self.settings, request, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_spi::{CategoryKind, ModelCoefficients, MonthOrdinalTable, StoreyRangeTable};
    use std::collections::BTreeMap;

    fn tables() -> PricingTables {
        let coef = ModelCoefficients {
            intercept: 300000.0,
            month_coefficient: 100.0,
            floor_area_coefficient: 3000.0,
            lease_year_coefficient: 50.0,
            storey_range_coefficient: 500.0,
            town_offsets: BTreeMap::from([("ANG MO KIO".to_string(), 0.0)]),
            flat_model_offsets: BTreeMap::from([("2-room".to_string(), -20000.0)]),
        };
        let negative = ModelCoefficients {
            intercept: -1_000_000.0,
            ..coef.clone()
        };
        let models = BTreeMap::from([
            ("Linear Regression".to_string(), coef),
            ("Negative".to_string(), negative),
        ]);
        let months = MonthOrdinalTable::try_from(BTreeMap::from([
            ("2022-01".to_string(), 769),
            ("2022-02".to_string(), 770),
        ]))
        .unwrap();
        let storeys =
            StoreyRangeTable::new(BTreeMap::from([("01 TO 03".to_string(), 1)])).unwrap();
        PricingTables::new(models, months, storeys, None, None).unwrap()
    }

    fn settings(clamp: ClampPolicy) -> EvaluationSettings {
        EvaluationSettings::for_reference(YearMonth::new(2022, 2).unwrap(), clamp)
    }

    fn request() -> PredictionRequest {
        PredictionRequest::new("Linear Regression", "ANG MO KIO", "01 TO 03", "2-room", 45.0, 1980)
    }

    fn feb() -> YearMonth {
        YearMonth::new(2022, 2).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let value = evaluate(&tables(), &settings(ClampPolicy::FloorAtZero), &request(), &feb())
            .unwrap();
        assert!((value - 591500.0).abs() < 1e-9);
        assert_eq!(round_cents(value), 591500.0);
    }

    #[test]
    fn test_month_slope() {
        let t = tables();
        let s = settings(ClampPolicy::FloorAtZero);
        let jan = evaluate(&t, &s, &request(), &YearMonth::new(2022, 1).unwrap()).unwrap();
        let feb = evaluate(&t, &s, &request(), &feb()).unwrap();
        assert!((feb - jan - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_policies() {
        let t = tables();
        let mut req = request();
        req.model_id = "Negative".to_string();

        let clamped = evaluate(&t, &settings(ClampPolicy::FloorAtZero), &req, &feb()).unwrap();
        assert_eq!(clamped, 0.0);

        let raw = evaluate(&t, &settings(ClampPolicy::Unclamped), &req, &feb()).unwrap();
        assert!((raw - (591500.0 - 1_300_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_floor_area() {
        let t = tables();
        let s = settings(ClampPolicy::FloorAtZero);
        for area in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let req = request().with_floor_area(area);
            assert!(matches!(
                evaluate(&t, &s, &req, &feb()),
                Err(PricingError::InvalidFloorArea(_))
            ));
        }
    }

    #[test]
    fn test_invalid_lease_year() {
        let t = tables();
        let s = settings(ClampPolicy::FloorAtZero);
        assert_eq!(
            evaluate(&t, &s, &request().with_lease_year(1959), &feb()),
            Err(PricingError::InvalidLeaseYear {
                year: 1959,
                min: 1960,
                max: 2022
            })
        );
        assert!(evaluate(&t, &s, &request().with_lease_year(2023), &feb()).is_err());
        assert!(evaluate(&t, &s, &request().with_lease_year(1960), &feb()).is_ok());
        assert!(evaluate(&t, &s, &request().with_lease_year(2022), &feb()).is_ok());
    }

    #[test]
    fn test_lookup_failures() {
        let t = tables();
        let s = settings(ClampPolicy::FloorAtZero);

        let mut req = request();
        req.town = "MARS CITY".to_string();
        assert_eq!(
            evaluate(&t, &s, &req, &feb()),
            Err(PricingError::UnknownCategory {
                kind: CategoryKind::Town,
                value: "MARS CITY".to_string()
            })
        );

        let mut req = request();
        req.storey_range = "04 TO 06".to_string();
        assert!(matches!(
            evaluate(&t, &s, &req, &feb()),
            Err(PricingError::UnknownCategory {
                kind: CategoryKind::StoreyRange,
                ..
            })
        ));

        let mut req = request();
        req.model_id = "Random Forest".to_string();
        assert_eq!(
            evaluate(&t, &s, &req, &feb()),
            Err(PricingError::UnknownModel("Random Forest".to_string()))
        );

        assert_eq!(
            evaluate(&t, &s, &request(), &YearMonth::new(2010, 1).unwrap()),
            Err(PricingError::UnknownMonth("2010-01".to_string()))
        );
    }

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(1.005_f64 + 1e-9), 1.01);
        assert_eq!(round_cents(2.5), 2.5);
        assert_eq!(round_cents(123.454), 123.45);
        assert_eq!(round_cents(123.455001), 123.46);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn test_evaluator_trait_matches_function() {
        let t = tables();
        let s = settings(ClampPolicy::FloorAtZero);
        let evaluator = LinearEvaluator::new(&t, s);
        assert_eq!(
            evaluator.evaluate(&request(), &feb()).unwrap(),
            evaluate(&t, &s, &request(), &feb()).unwrap()
        );
        assert_eq!(evaluator.settings().max_lease_year, 2022);
    }
}
