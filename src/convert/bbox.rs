//! Bounding box over exported GeoJSON geometries

use crate::types::{BoundingBox2D, Vector2};
use geojson::{Feature, Value};

/// Extent of the x/y coordinates of every feature, `None` when no
/// coordinate was scanned
pub fn compute_bbox(features: &[Feature]) -> Option<BoundingBox2D> {
    let mut bbox: Option<BoundingBox2D> = None;
    for geometry in features.iter().filter_map(|f| f.geometry.as_ref()) {
        scan_value(&geometry.value, &mut bbox);
    }
    bbox
}

fn scan_value(value: &Value, bbox: &mut Option<BoundingBox2D>) {
    match value {
        Value::Point(p) => scan_position(p, bbox),
        Value::MultiPoint(points) | Value::LineString(points) => {
            points.iter().for_each(|p| scan_position(p, bbox))
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter()
            .flatten()
            .for_each(|p| scan_position(p, bbox)),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flatten()
            .for_each(|p| scan_position(p, bbox)),
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                scan_value(&geometry.value, bbox);
            }
        }
    }
}

fn scan_position(position: &[f64], bbox: &mut Option<BoundingBox2D>) {
    let [x, y, ..] = position else {
        return;
    };
    let point = Vector2::new(*x, *y);
    match bbox {
        Some(b) => b.expand_to_include(point),
        None => *bbox = Some(BoundingBox2D::from_point(point)),
    }
}
