//! API route handlers

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Form, Json};
use pricing_core::loader::{
    render_tables, FLAT_MODELS_FILE, MODELS_FILE, MONTHS_FILE, STOREY_RANGES_FILE, TOWNS_FILE,
};
use pricing_spi::{
    BatchScoringRequest, BatchScoringResponse, CategoryOptions, ScoringQuery, TrendPoint,
};

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn options(State(state): State<AppState>) -> Json<CategoryOptions> {
    Json(state.predictor.options())
}

fn predict(state: &AppState, query: &ScoringQuery) -> ApiResult<Vec<TrendPoint>> {
    let result = state.predictor.query(query)?;
    tracing::debug!(model = %query.model_id, points = result.len(), "predicted trend");
    Ok(Json(result.points().collect()))
}

pub async fn predict_query(
    State(state): State<AppState>,
    Query(query): Query<ScoringQuery>,
) -> ApiResult<Vec<TrendPoint>> {
    predict(&state, &query)
}

pub async fn predict_json(
    State(state): State<AppState>,
    Json(query): Json<ScoringQuery>,
) -> ApiResult<Vec<TrendPoint>> {
    predict(&state, &query)
}

pub async fn predict_form(
    State(state): State<AppState>,
    Form(query): Form<ScoringQuery>,
) -> ApiResult<Vec<TrendPoint>> {
    predict(&state, &query)
}

pub async fn score_rows(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    Json(batch): Json<BatchScoringRequest>,
) -> ApiResult<BatchScoringResponse> {
    if batch.method != "predict" {
        return Err(ApiError::UnsupportedMethod(batch.method));
    }
    let predict = state.predictor.score_rows(&model_id, &batch.data)?;
    Ok(Json(BatchScoringResponse { predict }))
}

/// Serve the loaded tables in the layout `fetch_tables` reads
pub async fn table_document(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = render_tables(state.predictor.tables())?;
    let body = match file.as_str() {
        MODELS_FILE => documents.models,
        MONTHS_FILE => documents.months,
        STOREY_RANGES_FILE => documents.storey_ranges,
        TOWNS_FILE => documents.towns.unwrap_or_default(),
        FLAT_MODELS_FILE => documents.flat_models.unwrap_or_default(),
        _ => return Ok(axum::http::StatusCode::NOT_FOUND.into_response()),
    };
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use pricing_api::{EvaluatorConfig, PricePredictor};
    use pricing_core::{StaticSource, TableDocuments};
    use pricing_spi::{PredictionRequest, PricingError, ScoringRow, YearMonth};

    fn state() -> AppState {
        let documents = TableDocuments {
            models: r#"{"Linear Regression": {"mapping": {
                "intercept": 300000, "month": 100, "floor_area_sqm": 3000,
                "lease_commence_date": 50, "storey_range": 500,
                "town": {"ANG MO KIO": 0}, "flat_model": {"2-room": -20000}}}}"#
                .to_string(),
            months: r#"{"2022-01": 769, "2022-02": 770}"#.to_string(),
            storey_ranges: r#"{"01 TO 03": 1}"#.to_string(),
            towns: None,
            flat_models: None,
        };
        let config = EvaluatorConfig {
            window_size: 2,
            ..EvaluatorConfig::default()
        };
        let predictor = PricePredictor::from_source(&StaticSource::new(documents), config).unwrap();
        AppState::new(predictor, "static")
    }

    fn request() -> PredictionRequest {
        PredictionRequest::new("Linear Regression", "ANG MO KIO", "01 TO 03", "2-room", 45.0, 1980)
    }

    #[tokio::test]
    async fn test_predict_json_uses_configured_window() {
        let query = ScoringQuery::from_request(&request(), None, None);
        let Json(points) = predict_json(State(state()), Json(query)).await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label, "2022-02");
        assert_eq!(points[1].data, 591500.0);
    }

    #[tokio::test]
    async fn test_predict_unknown_town_is_unprocessable() {
        let mut query = ScoringQuery::from_request(&request(), None, None);
        query.town = "MARS CITY".to_string();
        let err = predict_form(State(state()), Form(query)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "unknown_category");
    }

    #[tokio::test]
    async fn test_predict_negative_area() {
        let query = ScoringQuery::from_request(&request().with_floor_area(-5.0), None, None);
        let err = predict_query(State(state()), Query(query)).await.unwrap_err();
        assert!(matches!(err, ApiError::Pricing(PricingError::InvalidFloorArea(_))));
    }

    #[tokio::test]
    async fn test_score_rows() {
        let month = YearMonth::new(2022, 2).unwrap();
        let batch = BatchScoringRequest {
            data: vec![ScoringRow::new(&request(), month)],
            method: "predict".to_string(),
        };
        let Json(response) = score_rows(
            State(state()),
            Path("Linear Regression".to_string()),
            Json(batch.clone()),
        )
        .await
        .unwrap();
        assert_eq!(response.predict, vec![591500.0]);

        let err = score_rows(State(state()), Path("Lasso".to_string()), Json(batch))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_score_rows_rejects_other_methods() {
        let batch = BatchScoringRequest {
            data: Vec::new(),
            method: "predict_proba".to_string(),
        };
        let err = score_rows(State(state()), Path("Linear Regression".to_string()), Json(batch))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMethod(_)));
    }

    #[tokio::test]
    async fn test_options() {
        let Json(options) = options(State(state())).await;
        assert_eq!(options.town_list, vec!["ANG MO KIO"]);
        assert_eq!(options.storey_range_list, vec!["01 TO 03"]);
    }

    #[tokio::test]
    async fn test_table_documents() {
        let response = table_document(State(state()), Path(MONTHS_FILE.to_string()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let months: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(months["2022-02"], 770);

        let response = table_document(State(state()), Path("secrets.json".to_string()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
