//! Remote scoring and table fetching
//!
//! Client side of an external scoring endpoint. The endpoint performs the
//! same linear evaluation server-side; this module only moves requests and
//! responses. Timeouts are set by the caller, failures are reported as
//! [`PricingError::DataSourceUnavailable`] and never retried here.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pricing_core::remote::{RemoteScorer, WireFormat};
//! use pricing_core::trend::trend_months;
//! use pricing_spi::{PredictionRequest, WindowPolicy, YearMonth};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scorer = RemoteScorer::new(
//!         "http://localhost:8080/api/v1/predict",
//!         WireFormat::Json,
//!         Duration::from_secs(10),
//!     )
//!     .unwrap();
//!     let request = PredictionRequest::new(
//!         "Linear Regression", "ANG MO KIO", "01 TO 03", "Improved", 90.0, 1985,
//!     );
//!     let reference = YearMonth::new(2022, 2).unwrap();
//!     let months = trend_months(reference, 13, WindowPolicy::Trailing).unwrap();
//!     let result = scorer.score(&request, &months).await.unwrap();
//!     println!("{:?}", result.latest());
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use pricing_spi::{
    BatchScoringRequest, BatchScoringResponse, PredictionRequest, PredictionResult, PricingError,
    PricingTables, Result, ScoringQuery, ScoringResponse, YearMonth,
};

use crate::loader::{
    parse_tables, TableDocuments, FLAT_MODELS_FILE, MODELS_FILE, MONTHS_FILE,
    STOREY_RANGES_FILE, TOWNS_FILE,
};

/// How a scoring request is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// POST with a JSON [`ScoringQuery`] body
    Json,
    /// GET with [`ScoringQuery`] as the query string
    Query,
    /// POST with a form-encoded [`ScoringQuery`] body
    Form,
    /// POST a [`BatchScoringRequest`], one feature row per month
    BatchRows,
}

fn unavailable(context: &str, error: impl std::fmt::Display) -> PricingError {
    PricingError::DataSourceUnavailable(format!("{}: {}", context, error))
}

fn request_error(endpoint: &str, error: reqwest::Error) -> PricingError {
    if error.is_timeout() {
        unavailable(endpoint, "request timed out")
    } else {
        unavailable(endpoint, error)
    }
}

/// Client for an external scoring endpoint
#[derive(Debug, Clone)]
pub struct RemoteScorer {
    client: Client,
    endpoint: String,
    format: WireFormat,
}

impl RemoteScorer {
    /// Scorer with its own client bounded by `timeout`
    pub fn new(endpoint: &str, format: WireFormat, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| unavailable(endpoint, e))?;
        Ok(Self::with_client(client, endpoint, format))
    }

    /// Scorer reusing an existing client
    pub fn with_client(client: Client, endpoint: &str, format: WireFormat) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            format,
        }
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wire format in use
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Score `request` for each of `months` (consecutive, increasing)
    pub async fn score(
        &self,
        request: &PredictionRequest,
        months: &[YearMonth],
    ) -> Result<PredictionResult> {
        let (Some(&first), Some(&last)) = (months.first(), months.last()) else {
            return Err(PricingError::InvalidParameter {
                name: "months".to_string(),
                reason: "at least one month is required".to_string(),
            });
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            format = ?self.format,
            months = months.len(),
            "scoring remotely"
        );

        let query = ScoringQuery::from_request(request, Some(first), Some(last));
        let response = match self.format {
            WireFormat::Json => self.client.post(&self.endpoint).json(&query),
            WireFormat::Query => self.client.get(&self.endpoint).query(&query),
            WireFormat::Form => self.client.post(&self.endpoint).form(&query),
            WireFormat::BatchRows => self
                .client
                .post(&self.endpoint)
                .json(&BatchScoringRequest::new(request, months)),
        }
        .send()
        .await
        .map_err(|e| request_error(&self.endpoint, e))?;

        let body = read_body(&self.endpoint, response).await?;
        let result = match self.format {
            WireFormat::BatchRows => {
                let batch: BatchScoringResponse = decode(&self.endpoint, &body)?;
                pair_with_labels(months, batch.predict)
            }
            _ => {
                let scored: ScoringResponse = decode(&self.endpoint, &body)?;
                from_scoring_response(months, scored)
            }
        };

        result.map_err(|e| {
            tracing::warn!(endpoint = %self.endpoint, error = %e, "remote scoring failed");
            e
        })
    }
}

async fn read_body(endpoint: &str, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| request_error(endpoint, e))?;
    if !status.is_success() {
        return Err(unavailable(
            endpoint,
            format!("status {}: {}", status.as_u16(), body.trim()),
        ));
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| unavailable(endpoint, e))
}

fn pair_with_labels(months: &[YearMonth], values: Vec<f64>) -> Result<PredictionResult> {
    if values.len() != months.len() {
        return Err(PricingError::DataSourceUnavailable(format!(
            "expected {} values, got {}",
            months.len(),
            values.len()
        )));
    }
    Ok(PredictionResult {
        labels: months.iter().map(YearMonth::to_string).collect(),
        values,
    })
}

fn from_scoring_response(
    months: &[YearMonth],
    response: ScoringResponse,
) -> Result<PredictionResult> {
    match response {
        ScoringResponse::Values(values) => pair_with_labels(months, values),
        ScoringResponse::Points(points) => {
            if points.len() != months.len() {
                return Err(PricingError::DataSourceUnavailable(format!(
                    "expected {} points, got {}",
                    months.len(),
                    points.len()
                )));
            }
            // Labels must follow the requested months, in order
            for (index, (point, month)) in points.iter().zip(months).enumerate() {
                let expected = month.to_string();
                if point.label != expected {
                    return Err(PricingError::DataSourceUnavailable(format!(
                        "point {} is labelled '{}', expected '{}'",
                        index, point.label, expected
                    )));
                }
            }
            Ok(points.into_iter().collect())
        }
    }
}

async fn fetch_document(client: &Client, base_url: &str, file: &str) -> Result<Option<String>> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), file);
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| request_error(&url, e))?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    read_body(&url, response).await.map(Some)
}

async fn fetch_required(client: &Client, base_url: &str, file: &str) -> Result<String> {
    fetch_document(client, base_url, file)
        .await?
        .ok_or_else(|| unavailable(file, "not found"))
}

/// Fetch and validate the tables published under `base_url`
pub async fn fetch_tables_with(client: &Client, base_url: &str) -> Result<PricingTables> {
    let documents = TableDocuments {
        models: fetch_required(client, base_url, MODELS_FILE).await?,
        months: fetch_required(client, base_url, MONTHS_FILE).await?,
        storey_ranges: fetch_required(client, base_url, STOREY_RANGES_FILE).await?,
        towns: fetch_document(client, base_url, TOWNS_FILE).await?,
        flat_models: fetch_document(client, base_url, FLAT_MODELS_FILE).await?,
    };
    let tables = parse_tables(&documents)?;
    tracing::info!(base_url, models = tables.model_ids().count(), "fetched pricing tables");
    Ok(tables)
}

/// [`fetch_tables_with`] on a fresh client bounded by `timeout`
pub async fn fetch_tables(base_url: &str, timeout: Duration) -> Result<PricingTables> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| unavailable(base_url, e))?;
    fetch_tables_with(&client, base_url).await
}
