//! HTTP API tests, driving the router in-process

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{encode, site_plan};
use dxf_geojson::server::router;
use dxf_geojson::ServiceConfig;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(max_payload_bytes: usize) -> Router {
    let config = ServiceConfig {
        max_payload_bytes,
        ..ServiceConfig::default()
    };
    router(&config)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn post_convert(app: Router, body: Value) -> (StatusCode, Value) {
    send(app, post_json(body.to_string())).await
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(1024), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["gdal_version"].as_str().unwrap().contains(dxf_geojson::VERSION));
    assert_eq!(body["ogr_drivers"], json!(["DXF", "DXF-Binary"]));
}

#[tokio::test]
async fn test_convert_success() {
    let (status, body) = post_convert(
        app(1 << 20),
        json!({ "dxf_base64": encode(site_plan().as_bytes()), "keep_original_coords": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 5);
    assert!(body.get("crs").is_none());
    assert_eq!(body["bbox"], json!([0.0, 0.0, 100.0, 50.0]));
}

#[tokio::test]
async fn test_invalid_base64() {
    let (status, body) = post_convert(app(1 << 20), json!({ "dxf_base64": "***" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_whitespace_payload() {
    let (status, _) = post_convert(app(1 << 20), json!({ "dxf_base64": "   \n " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_payload() {
    let payload = encode(&vec![b'0'; 2048]);
    let (status, body) = post_convert(app(1024), json!({ "dxf_base64": payload })).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("1024"));
}

#[tokio::test]
async fn test_unreadable_drawing() {
    let (status, body) = post_convert(
        app(1 << 20),
        json!({ "dxf_base64": encode(b"plain text, not a drawing") }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_bad_crs() {
    let (status, body) = post_convert(
        app(1 << 20),
        json!({
            "dxf_base64": encode(site_plan().as_bytes()),
            "source_crs": "EPSG:31982",
            "target_crs": "not-a-crs"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("not-a-crs"));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = send(app(1024), post_json("{\"dxf_base64\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_member() {
    let (status, body) = post_convert(app(1024), json!({ "source_crs": "EPSG:4326" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("dxf_base64"));
}

#[tokio::test]
async fn test_mistyped_member() {
    let (status, _) = post_convert(
        app(1024),
        json!({ "dxf_base64": "AA==", "keep_original_coords": "yes" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_body_over_transport_limit() {
    let config = ServiceConfig {
        max_payload_bytes: 1024,
        ..ServiceConfig::default()
    };
    let body = json!({ "dxf_base64": "A".repeat(config.body_limit() + 1) });
    let (status, body) = send(router(&config), post_json(body.to_string())).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("1024"));
}

#[tokio::test]
async fn test_features_share_entities_layer() {
    let (status, body) = post_convert(
        app(1 << 20),
        json!({ "dxf_base64": encode(site_plan().as_bytes()), "keep_original_coords": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_array().unwrap();
    assert!(features.iter().all(|f| f["properties"]["layer"] == "entities"));
    assert_eq!(features[0]["properties"]["Layer"], "Roads");
}
