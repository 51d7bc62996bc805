//! Bodies exchanged with scoring endpoints

use serde::{Deserialize, Serialize};

use crate::model::{PredictionRequest, TrendPoint, YearMonth};

/// Scoring request carried as a query string, form body or JSON body.
///
/// `month_start` / `month_end` bound an inclusive month range; when both are
/// omitted the scorer uses its configured window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringQuery {
    #[serde(alias = "ml_model")]
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_start: Option<YearMonth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_end: Option<YearMonth>,
    pub town: String,
    pub storey_range: String,
    pub flat_model: String,
    pub floor_area_sqm: f64,
    #[serde(alias = "lease_commence_date")]
    pub lease_commence_year: i32,
}

impl ScoringQuery {
    /// Query for `request` over an optional month range
    pub fn from_request(
        request: &PredictionRequest,
        month_start: Option<YearMonth>,
        month_end: Option<YearMonth>,
    ) -> Self {
        Self {
            model_id: request.model_id.clone(),
            month_start,
            month_end,
            town: request.town.clone(),
            storey_range: request.storey_range.clone(),
            flat_model: request.flat_model.clone(),
            floor_area_sqm: request.floor_area_sqm,
            lease_commence_year: request.lease_commence_year,
        }
    }

    /// The flat attributes without the month range
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest {
            model_id: self.model_id.clone(),
            town: self.town.clone(),
            storey_range: self.storey_range.clone(),
            flat_model: self.flat_model.clone(),
            floor_area_sqm: self.floor_area_sqm,
            lease_commence_year: self.lease_commence_year,
        }
    }
}

/// Scoring response: labelled points, or bare values paired with known labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoringResponse {
    Points(Vec<TrendPoint>),
    Values(Vec<f64>),
}

/// One positional feature row:
/// `[month, town, storey_range, floor_area_sqm, flat_model, lease_commence_year]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRow(
    pub YearMonth,
    pub String,
    pub String,
    pub f64,
    pub String,
    pub i32,
);

impl ScoringRow {
    /// Row for `request` at `month`
    pub fn new(request: &PredictionRequest, month: YearMonth) -> Self {
        Self(
            month,
            request.town.clone(),
            request.storey_range.clone(),
            request.floor_area_sqm,
            request.flat_model.clone(),
            request.lease_commence_year,
        )
    }

    /// Month of the row
    pub fn month(&self) -> YearMonth {
        self.0
    }

    /// Rebuild the request for `model_id`
    pub fn request(&self, model_id: &str) -> PredictionRequest {
        PredictionRequest {
            model_id: model_id.to_string(),
            town: self.1.clone(),
            storey_range: self.2.clone(),
            floor_area_sqm: self.3,
            flat_model: self.4.clone(),
            lease_commence_year: self.5,
        }
    }
}

/// Batch scoring body, one row per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScoringRequest {
    pub data: Vec<ScoringRow>,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "predict".to_string()
}

impl BatchScoringRequest {
    /// Batch for `request` across `months`
    pub fn new(request: &PredictionRequest, months: &[YearMonth]) -> Self {
        Self {
            data: months.iter().map(|&m| ScoringRow::new(request, m)).collect(),
            method: default_method(),
        }
    }
}

/// Batch scoring response, values in row order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScoringResponse {
    pub predict: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PredictionRequest {
        PredictionRequest::new("Linear Regression", "ANG MO KIO", "01 TO 03", "2-room", 45.0, 1980)
    }

    #[test]
    fn test_batch_request_shape() {
        let months = [YearMonth::new(2022, 1).unwrap(), YearMonth::new(2022, 2).unwrap()];
        let body = BatchScoringRequest::new(&request(), &months);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["method"], "predict");
        assert_eq!(
            json["data"][1],
            serde_json::json!(["2022-02", "ANG MO KIO", "01 TO 03", 45.0, "2-room", 1980])
        );
    }

    #[test]
    fn test_row_rebuilds_request() {
        let row = ScoringRow::new(&request(), YearMonth::new(2022, 2).unwrap());
        assert_eq!(row.request("Linear Regression"), request());
        assert_eq!(row.month().to_string(), "2022-02");
    }

    #[test]
    fn test_query_omits_missing_months() {
        let query = ScoringQuery::from_request(&request(), None, None);
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("month_start").is_none());
        assert_eq!(query.request(), request());
    }

    #[test]
    fn test_scoring_response_variants() {
        let points: ScoringResponse =
            serde_json::from_str(r#"[{"label":"2022-02","data":1.5}]"#).unwrap();
        assert!(matches!(points, ScoringResponse::Points(ref p) if p.len() == 1));

        let values: ScoringResponse = serde_json::from_str("[1.5, 2.5]").unwrap();
        assert_eq!(values, ScoringResponse::Values(vec![1.5, 2.5]));
    }
}
