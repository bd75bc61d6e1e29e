//! Endpoint handlers

use super::AppState;
use crate::convert::{convert, ConvertRequest};
use crate::error::ConvertError;
use crate::io::DRIVERS;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub gdal_version: String,
    pub ogr_drivers: Vec<String>,
}

/// Library and backend versions reported by the health check
pub fn library_version() -> String {
    format!("dxf-geojson {} (proj4rs reprojection)", crate::VERSION)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        gdal_version: library_version(),
        ogr_drivers: DRIVERS.names().into_iter().map(str::to_string).collect(),
    })
}

pub async fn convert_dxf(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<FeatureCollection>, ConvertError> {
    let Json(request) = payload.map_err(|rejection| reject_body(rejection, &state))?;
    let limit = state.max_payload_bytes;

    let collection = tokio::task::spawn_blocking(move || convert(&request, limit))
        .await
        .map_err(|err| ConvertError::Worker(err.to_string()))??;

    tracing::info!(features = collection.features.len(), "converted drawing");
    Ok(Json(collection))
}

fn reject_body(rejection: JsonRejection, state: &AppState) -> ConvertError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ConvertError::PayloadTooLarge {
            limit: state.max_payload_bytes,
        };
    }
    match rejection {
        JsonRejection::JsonSyntaxError(err) => ConvertError::MalformedBody(err.body_text()),
        JsonRejection::JsonDataError(err) => ConvertError::InvalidBody(err.body_text()),
        JsonRejection::MissingJsonContentType(err) => ConvertError::InvalidBody(err.body_text()),
        other => ConvertError::MalformedBody(other.body_text()),
    }
}
