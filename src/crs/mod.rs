//! Spatial references and coordinate transforms
//!
//! Identifiers are parsed by [`parse::parse_identifier`] and resolved to
//! proj4 definitions, EPSG codes through the embedded EPSG table. Transforms
//! take and return coordinates in traditional GIS order (easting or
//! longitude first), with geographic coordinates in degrees.

pub mod parse;

pub use parse::{parse_identifier, CrsIdentifier};

use crate::error::CrsError;
use crate::types::Vector3;
use proj4rs::Proj;
use std::fmt;

const CRS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// A resolved spatial reference system
pub struct SpatialReference {
    input: String,
    definition: String,
    proj: Proj,
}

impl SpatialReference {
    /// Interpret a user identifier such as `EPSG:31982` or a `+proj=` string
    pub fn from_user_input(input: &str) -> Result<Self, CrsError> {
        let id = parse_identifier(input).ok_or_else(|| CrsError::Unparsable(input.to_string()))?;

        let definition = match id {
            CrsIdentifier::Epsg(code) => u16::try_from(code)
                .ok()
                .and_then(crs_definitions::from_code)
                .map(|def| def.proj4.to_string())
                .filter(|proj4| !proj4.is_empty())
                .ok_or_else(|| CrsError::Unknown(input.to_string()))?,
            CrsIdentifier::Crs84 => CRS84_PROJ.to_string(),
            CrsIdentifier::Proj(definition) => definition,
        };

        let proj = Proj::from_proj_string(&definition)?;
        Ok(SpatialReference {
            input: input.trim().to_string(),
            definition,
            proj,
        })
    }

    /// The identifier this reference was built from
    pub fn input(&self) -> &str {
        &self.input
    }

    /// proj4 definition string
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Coordinates are longitude/latitude
    pub fn is_geographic(&self) -> bool {
        self.proj.is_latlong()
    }
}

impl fmt::Debug for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialReference")
            .field("input", &self.input)
            .field("definition", &self.definition)
            .finish()
    }
}

/// Converts coordinates from one spatial reference to another
#[derive(Debug)]
pub struct CoordinateTransform {
    source: SpatialReference,
    target: SpatialReference,
}

impl CoordinateTransform {
    pub fn new(source: SpatialReference, target: SpatialReference) -> Self {
        CoordinateTransform { source, target }
    }

    pub fn source(&self) -> &SpatialReference {
        &self.source
    }

    pub fn target(&self) -> &SpatialReference {
        &self.target
    }

    /// Transform one point; non-finite results are errors
    pub fn transform(&self, point: Vector3) -> Result<Vector3, CrsError> {
        let mut xyz = if self.source.is_geographic() {
            (point.x.to_radians(), point.y.to_radians(), point.z)
        } else {
            (point.x, point.y, point.z)
        };

        proj4rs::transform::transform(&self.source.proj, &self.target.proj, &mut xyz)?;

        if self.target.is_geographic() {
            xyz.0 = xyz.0.to_degrees();
            xyz.1 = xyz.1.to_degrees();
        }

        let out = Vector3::new(xyz.0, xyz.1, xyz.2);
        if out.is_finite() {
            Ok(out)
        } else {
            Err(CrsError::Projection(format!(
                "non-finite result for {}",
                point
            )))
        }
    }
}
