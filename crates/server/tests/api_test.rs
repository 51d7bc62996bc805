//! HTTP-level tests for status codes and bodies

use std::net::SocketAddr;

use pricing_api::{EvaluatorConfig, JsonDirSource, PricePredictor};
use pricing_server::{app, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

async fn spawn_server() -> SocketAddr {
    let predictor =
        PricePredictor::from_source(&JsonDirSource::new(DATA_DIR), EvaluatorConfig::default())
            .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app(AppState::new(predictor, "test"))).await });
    addr
}

fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

fn query() -> Value {
    json!({
        "ml_model": "Ridge Regression",
        "town": "SENGKANG",
        "storey_range": "13 TO 15",
        "flat_model": "Premium Apartment",
        "floor_area_sqm": 110.0,
        "lease_commence_date": 2003
    })
}

#[tokio::test]
async fn test_health_endpoints() {
    let addr = spawn_server().await;
    let client = client();

    let live: Value = client
        .get(format!("http://{}/health/live", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live["status"], "alive");

    let ready: Value = client
        .get(format!("http://{}/health/ready", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["models"], 2);
    assert_eq!(ready["first_month"], "2017-01");
    assert_eq!(ready["last_month"], "2022-02");
    assert_eq!(ready["source"], "test");
}

#[tokio::test]
async fn test_options() {
    let addr = spawn_server().await;
    let options: Value = client()
        .get(format!("http://{}/api/v1/options", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(options["ml_model_list"], json!(["Linear Regression", "Ridge Regression"]));
    assert_eq!(options["town_list"].as_array().unwrap().len(), 26);
    assert_eq!(options["storey_range_list"].as_array().unwrap().len(), 17);
    assert_eq!(options["flat_model_list"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn test_predict_returns_labelled_points() {
    let addr = spawn_server().await;
    let response = client()
        .post(format!("http://{}/api/v1/predict", addr))
        .json(&query())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let points: Vec<Value> = response.json().await.unwrap();
    assert_eq!(points.len(), 13);
    assert_eq!(points[0]["label"], "2021-02");
    assert_eq!(points[12]["label"], "2022-02");
    assert!(points.iter().all(|p| p["data"].as_f64().unwrap() >= 0.0));
}

#[tokio::test]
async fn test_predict_with_month_range() {
    let addr = spawn_server().await;
    let mut body = query();
    body["month_start"] = json!("2019-12");
    body["month_end"] = json!("2020-03");

    let points: Vec<Value> = client()
        .post(format!("http://{}/api/v1/predict", addr))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let labels: Vec<&str> = points.iter().map(|p| p["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["2019-12", "2020-01", "2020-02", "2020-03"]);
}

#[tokio::test]
async fn test_error_statuses() {
    let addr = spawn_server().await;
    let client = client();
    let url = format!("http://{}/api/v1/predict", addr);

    let mut unknown_model = query();
    unknown_model["ml_model"] = json!("Random Forest");
    let response = client.post(&url).json(&unknown_model).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "unknown_model");

    let mut bad_area = query();
    bad_area["floor_area_sqm"] = json!(-5.0);
    let response = client.post(&url).json(&bad_area).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_floor_area");

    let mut out_of_table = query();
    out_of_table["month_start"] = json!("2016-11");
    out_of_table["month_end"] = json!("2017-02");
    let response = client.post(&url).json(&out_of_table).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unknown month: 2016-11");
}

#[tokio::test]
async fn test_unknown_table_file() {
    let addr = spawn_server().await;
    let response = client()
        .get(format!("http://{}/tables/passwd", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
