//! DXF to GeoJSON conversion pipeline
//!
//! A request goes through: payload decoding, staging in a temporary
//! directory, opening the drawing, building the optional coordinate
//! transform, collecting features, computing the bounding box and
//! assembling the FeatureCollection.

pub mod bbox;
pub mod features;

pub use bbox::compute_bbox;
pub use features::{collect_features, feature_properties};

use crate::crs::{CoordinateTransform, SpatialReference};
use crate::error::ConvertError;
use crate::source::DataSource;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use geojson::{FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Decoded payload ceiling, 200 MiB
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Name of the staged drawing inside its temporary directory
const STAGED_FILE_NAME: &str = "input.dxf";

fn default_target_crs() -> Option<String> {
    Some("EPSG:4326".to_string())
}

fn default_true() -> bool {
    true
}

/// Body of `POST /convert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Drawing bytes, base64 encoded
    pub dxf_base64: String,
    #[serde(default)]
    pub source_crs: Option<String>,
    #[serde(default = "default_target_crs")]
    pub target_crs: Option<String>,
    #[serde(default)]
    pub keep_original_coords: bool,
    #[serde(default = "default_true")]
    pub include_ogr_fields: bool,
}

impl ConvertRequest {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            source_crs: self.source_crs.clone(),
            target_crs: self.target_crs.clone(),
            keep_original_coords: self.keep_original_coords,
            include_fields: self.include_ogr_fields,
        }
    }
}

/// Everything about a conversion except the drawing itself
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub source_crs: Option<String>,
    pub target_crs: Option<String>,
    pub keep_original_coords: bool,
    pub include_fields: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            source_crs: None,
            target_crs: default_target_crs(),
            keep_original_coords: false,
            include_fields: true,
        }
    }
}

/// Decode `dxf_base64`, enforcing the payload ceiling
pub fn decode_payload(encoded: &str, max_bytes: usize) -> Result<Vec<u8>, ConvertError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(ConvertError::EmptyPayload);
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| ConvertError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(ConvertError::EmptyPayload);
    }
    if bytes.len() > max_bytes {
        return Err(ConvertError::PayloadTooLarge { limit: max_bytes });
    }
    Ok(bytes)
}

/// A payload written to its own temporary directory
///
/// The directory and the file are removed when this value is dropped.
#[derive(Debug)]
pub struct TransientFile {
    dir: TempDir,
    path: PathBuf,
}

impl TransientFile {
    /// Stage `bytes` under the system temporary directory
    pub fn write(bytes: &[u8]) -> io::Result<Self> {
        Self::write_in(&std::env::temp_dir(), bytes)
    }

    /// Stage `bytes` in a fresh directory below `root`
    pub fn write_in(root: &Path, bytes: &[u8]) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("dxf-geojson-")
            .tempdir_in(root)?;
        let path = dir.path().join(STAGED_FILE_NAME);
        fs::write(&path, bytes)?;
        Ok(TransientFile { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Source to target transform, or `None` when no reprojection is wanted
///
/// Identifiers are only interpreted when both are set and differ.
pub fn build_coord_transform(
    source_crs: Option<&str>,
    target_crs: Option<&str>,
) -> Result<Option<CoordinateTransform>, ConvertError> {
    let (Some(source), Some(target)) = (source_crs, target_crs) else {
        return Ok(None);
    };
    if source.is_empty() || target.is_empty() || source == target {
        return Ok(None);
    }

    let source_ref = SpatialReference::from_user_input(source).map_err(|err| {
        tracing::debug!(%err, "source_crs rejected");
        ConvertError::InvalidCrs {
            field: "source_crs",
            value: source.to_string(),
        }
    })?;
    let target_ref = SpatialReference::from_user_input(target).map_err(|err| {
        tracing::debug!(%err, "target_crs rejected");
        ConvertError::InvalidCrs {
            field: "target_crs",
            value: target.to_string(),
        }
    })?;
    tracing::debug!(
        source = source_ref.definition(),
        target = target_ref.definition(),
        "reprojecting"
    );
    Ok(Some(CoordinateTransform::new(source_ref, target_ref)))
}

/// Wrap features in a collection with optional bbox and CRS annotation
pub fn assemble(
    features: Vec<geojson::Feature>,
    bbox: Option<[f64; 4]>,
    crs_name: Option<&str>,
) -> FeatureCollection {
    let foreign_members = crs_name.map(|name| {
        let mut members = JsonObject::new();
        members.insert(
            "crs".to_string(),
            serde_json::json!({ "type": "name", "properties": { "name": name } }),
        );
        members
    });

    FeatureCollection {
        bbox: bbox.map(|b| b.to_vec()),
        features,
        foreign_members,
    }
}

/// Convert a drawing on disk
pub fn convert_path(path: &Path, options: &ConvertOptions) -> Result<FeatureCollection, ConvertError> {
    let source = DataSource::open(path).map_err(|err| {
        tracing::info!(%err, "drawing could not be opened");
        ConvertError::Unreadable(err)
    })?;

    let transform = if options.keep_original_coords {
        None
    } else {
        build_coord_transform(options.source_crs.as_deref(), options.target_crs.as_deref())?
    };

    let features = collect_features(&source, transform.as_ref(), options.include_fields);
    let bbox = compute_bbox(&features).map(|b| b.to_array());
    let crs_name = if options.keep_original_coords {
        None
    } else {
        options.target_crs.as_deref().filter(|name| !name.is_empty())
    };

    tracing::debug!(
        driver = source.driver_name(),
        version = ?source.version(),
        features = features.len(),
        reprojected = transform.is_some(),
        "conversion finished"
    );
    Ok(assemble(features, bbox, crs_name))
}

/// Run a complete `/convert` request
pub fn convert(request: &ConvertRequest, max_payload_bytes: usize) -> Result<FeatureCollection, ConvertError> {
    convert_in(&std::env::temp_dir(), request, max_payload_bytes)
}

/// [`convert`], staging the payload below `staging_root`
///
/// The staged directory is removed whether or not the conversion succeeds.
pub fn convert_in(
    staging_root: &Path,
    request: &ConvertRequest,
    max_payload_bytes: usize,
) -> Result<FeatureCollection, ConvertError> {
    let bytes = decode_payload(&request.dxf_base64, max_payload_bytes)?;
    let staged = TransientFile::write_in(staging_root, &bytes)?;
    tracing::debug!(bytes = bytes.len(), dir = %staged.dir().display(), "payload staged");
    convert_path(staged.path(), &request.options())
}
