//! Source features to GeoJSON features

use crate::crs::CoordinateTransform;
use crate::geometry::Geometry;
use crate::source::{DataSource, Feature};
use geojson::JsonObject;

/// Text keys copied even when attribute fields are excluded; each one that
/// names a field (ignoring case) is added unless already present
const TEXT_KEYS: [&str; 4] = ["Text", "MTEXT", "TEXT", "MText"];

/// Export every feature of every layer, in layer order
///
/// Features whose geometry is missing, fails to transform or cannot be
/// exported are left out; their number is logged.
pub fn collect_features(
    source: &DataSource,
    transform: Option<&CoordinateTransform>,
    include_fields: bool,
) -> Vec<geojson::Feature> {
    let mut features = Vec::with_capacity(source.feature_count());
    let mut dropped = 0usize;

    for layer in source.layers() {
        for feature in layer.features() {
            let Some(geometry) = export_geometry(feature.geometry(), transform) else {
                dropped += 1;
                continue;
            };
            features.push(geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(feature_properties(layer.name(), feature, include_fields)),
                foreign_members: None,
            });
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, kept = features.len(), "features without usable geometry dropped");
    }
    features
}

/// Clone, optionally transform, and export one geometry
fn export_geometry(
    geometry: Option<&Geometry>,
    transform: Option<&CoordinateTransform>,
) -> Option<geojson::Geometry> {
    let mut geometry = geometry?.clone();
    if let Some(transform) = transform {
        if let Err(err) = geometry.try_map_points(|p| transform.transform(p)) {
            tracing::trace!(%err, "geometry transform failed");
            return None;
        }
    }
    geometry.to_geojson()
}

/// Properties of one feature
///
/// With `include_fields` every schema field is copied. A `layer` key naming
/// the source layer is added unless a field already uses it, then the text
/// field under each of [`TEXT_KEYS`] that resolves to it.
pub fn feature_properties(layer_name: &str, feature: &Feature, include_fields: bool) -> JsonObject {
    let mut props = JsonObject::new();

    if include_fields {
        for (name, value) in feature.fields() {
            props.insert(name.to_string(), value.into());
        }
    }

    if !layer_name.is_empty() && !props.contains_key("layer") {
        props.insert("layer".to_string(), layer_name.into());
    }

    for key in TEXT_KEYS {
        if let Some(value) = feature.field(key) {
            props.entry(key).or_insert_with(|| value.into());
        }
    }

    props
}
