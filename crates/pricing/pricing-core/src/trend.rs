//! Trend series generation
//!
//! Builds a window of consecutive calendar months and evaluates the same
//! request for each one. A single failing month fails the whole series.

use pricing_spi::{
    PriceModel, PredictionRequest, PredictionResult, PricingError, Result, WindowPolicy,
    YearMonth,
};

use crate::evaluator::round_cents;

/// Longest series a caller may request
pub const MAX_SERIES_MONTHS: usize = 240;

fn invalid(name: &str, reason: String) -> PricingError {
    PricingError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}

/// `window_size` consecutive months placed around `reference` by `policy`,
/// in increasing order.
pub fn trend_months(
    reference: YearMonth,
    window_size: usize,
    policy: WindowPolicy,
) -> Result<Vec<YearMonth>> {
    if window_size == 0 {
        return Err(invalid("window_size", "must be at least 1".to_string()));
    }
    if window_size > MAX_SERIES_MONTHS {
        return Err(invalid(
            "window_size",
            format!("must be at most {}", MAX_SERIES_MONTHS),
        ));
    }

    let start = policy.start_offset(window_size);
    (0..window_size as i64)
        .map(|i| -> Result<YearMonth> {
            let offset = i32::try_from(start + i)
                .map_err(|_| invalid("window_size", "offset out of range".to_string()))?;
            reference
                .shift(offset)
                .ok_or_else(|| invalid("reference_month", format!("{} out of range", reference)))
        })
        .collect()
}

/// Every month from `start` to `end`, both included
pub fn months_between(start: YearMonth, end: YearMonth) -> Result<Vec<YearMonth>> {
    let span = start.months_until(&end);
    if span < 0 {
        return Err(invalid(
            "month_start",
            format!("{} is after month_end {}", start, end),
        ));
    }
    let len = span as usize + 1;
    if len > MAX_SERIES_MONTHS {
        return Err(invalid(
            "month_end",
            format!("range of {} months exceeds {}", len, MAX_SERIES_MONTHS),
        ));
    }
    trend_months(start, len, WindowPolicy::Forward)
}

/// Evaluate `request` for each of `months`, keeping their order.
///
/// With `round` set, values are rounded to cents for display.
pub fn generate_trend<M>(
    model: &M,
    request: &PredictionRequest,
    months: &[YearMonth],
    round: bool,
) -> Result<PredictionResult>
where
    M: PriceModel + ?Sized,
{
    let values = months
        .iter()
        .map(|month| -> Result<f64> {
            let value = model.evaluate(request, month)?;
            Ok(if round { round_cents(value) } else { value })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(PredictionResult {
        labels: months.iter().map(YearMonth::to_string).collect(),
        values,
    })
}
