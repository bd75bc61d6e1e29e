//! Simple-features geometry built from drawing entities
//!
//! Entities are flattened into one of six geometry kinds in world
//! coordinates. [`Geometry::to_geojson`] exports them; coordinates carry a
//! Z value only when some vertex is off the XY plane.

pub mod build;
pub mod tessellate;

pub use build::{
    build_features, build_features_within, PlacedEntity, MAX_BLOCK_DEPTH, MAX_EXPANDED_ENTITIES,
};

use crate::types::Vector3;
use std::fmt;

/// Explicit geometry type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// A geometry in world coordinates
///
/// Polygon rings are closed: the first vertex is repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Vector3),
    LineString(Vec<Vector3>),
    Polygon(Vec<Vec<Vector3>>),
    MultiPoint(Vec<Vector3>),
    MultiLineString(Vec<Vec<Vector3>>),
    MultiPolygon(Vec<Vec<Vec<Vector3>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Visit every vertex
    pub fn for_each_point(&self, mut f: impl FnMut(&Vector3)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::LineString(points) | Geometry::MultiPoint(points) => {
                points.iter().for_each(f)
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(f),
        }
    }

    /// Rewrite every vertex in place, stopping at the first error
    pub fn try_map_points<E>(
        &mut self,
        mut f: impl FnMut(Vector3) -> Result<Vector3, E>,
    ) -> Result<(), E> {
        let mut apply = |p: &mut Vector3| -> Result<(), E> {
            *p = f(*p)?;
            Ok(())
        };
        match self {
            Geometry::Point(p) => apply(p),
            Geometry::LineString(points) | Geometry::MultiPoint(points) => {
                points.iter_mut().try_for_each(apply)
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter_mut().flatten().try_for_each(apply)
            }
            Geometry::MultiPolygon(polygons) => polygons
                .iter_mut()
                .flatten()
                .flatten()
                .try_for_each(apply),
        }
    }

    /// True when some vertex has a non-zero Z
    pub fn has_z(&self) -> bool {
        let mut has_z = false;
        self.for_each_point(|p| has_z |= p.z != 0.0);
        has_z
    }

    /// Structurally usable: enough vertices and all of them finite
    pub fn is_valid(&self) -> bool {
        let mut finite = true;
        self.for_each_point(|p| finite &= p.is_finite());
        if !finite {
            return false;
        }

        let ring_ok = |ring: &Vec<Vector3>| ring.len() >= 4;
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(points) => points.len() >= 2,
            Geometry::MultiPoint(points) => !points.is_empty(),
            Geometry::Polygon(rings) => !rings.is_empty() && rings.iter().all(ring_ok),
            Geometry::MultiLineString(lines) => {
                !lines.is_empty() && lines.iter().all(|l| l.len() >= 2)
            }
            Geometry::MultiPolygon(polygons) => {
                !polygons.is_empty()
                    && polygons
                        .iter()
                        .all(|rings| !rings.is_empty() && rings.iter().all(ring_ok))
            }
        }
    }

    /// Export as a GeoJSON geometry; `None` when the geometry is unusable
    pub fn to_geojson(&self) -> Option<geojson::Geometry> {
        if !self.is_valid() {
            return None;
        }

        let with_z = self.has_z();
        let position = |p: &Vector3| -> geojson::Position {
            if with_z {
                vec![p.x, p.y, p.z]
            } else {
                vec![p.x, p.y]
            }
        };
        let line = |points: &Vec<Vector3>| points.iter().map(position).collect::<Vec<_>>();
        let rings = |rings: &Vec<Vec<Vector3>>| rings.iter().map(line).collect::<Vec<_>>();

        let value = match self {
            Geometry::Point(p) => geojson::Value::Point(position(p)),
            Geometry::LineString(points) => geojson::Value::LineString(line(points)),
            Geometry::Polygon(r) => geojson::Value::Polygon(rings(r)),
            Geometry::MultiPoint(points) => geojson::Value::MultiPoint(line(points)),
            Geometry::MultiLineString(lines) => geojson::Value::MultiLineString(rings(lines)),
            Geometry::MultiPolygon(polygons) => {
                geojson::Value::MultiPolygon(polygons.iter().map(rings).collect())
            }
        };
        Some(geojson::Geometry::new(value))
    }
}
