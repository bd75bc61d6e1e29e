//! # dxf-geojson
//!
//! Converts DXF drawings into GeoJSON FeatureCollections, with optional
//! reprojection between spatial reference systems, and serves the
//! conversion over HTTP.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dxf_geojson::convert::{convert_path, ConvertOptions};
//!
//! let options = ConvertOptions {
//!     source_crs: Some("EPSG:31982".into()),
//!     ..ConvertOptions::default()
//! };
//! let collection = convert_path("site.dxf".as_ref(), &options)?;
//! println!("{}", serde_json::to_string(&collection)?);
//! ```
//!
//! ## Architecture
//!
//! - [`io`] - format drivers and the DXF group-code reader
//! - [`document`] - the parsed [`Drawing`]: layers, blocks, entities
//! - [`geometry`] - entities placed in world coordinates as [`Geometry`]
//! - [`source`] - layers of features with attribute fields
//! - [`crs`] - spatial references and coordinate transforms
//! - [`convert`] - the request pipeline producing GeoJSON
//! - [`server`] - the axum HTTP API

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod convert;
pub mod crs;
pub mod document;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod io;
pub mod server;
pub mod source;
pub mod tables;
pub mod types;

pub use error::{ConfigError, ConvertError, CrsError, DxfError, Result};
pub use types::{BoundingBox2D, DxfVersion, Transform, Vector2, Vector3};

pub use entities::{EntityCommon, EntityType};
pub use tables::{Layer, Table, TableEntry};

pub use document::Drawing;
pub use geometry::{Geometry, GeometryKind};
pub use source::{DataSource, Feature, SourceLayer};

pub use config::ServiceConfig;
pub use convert::{ConvertOptions, ConvertRequest};
pub use crs::{CoordinateTransform, SpatialReference};
pub use io::dxf::DxfReader;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_drawing_creation() {
        let drawing = Drawing::new();
        assert_eq!(drawing.version, DxfVersion::Unknown);
        assert_eq!(drawing.entity_count(), 0);
    }
}
