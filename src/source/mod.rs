//! Read API over an opened drawing: layers of features with attributes
//!
//! A [`DataSource`] exposes the drawing's placed entities as a single
//! [`SourceLayer`] named [`ENTITIES_LAYER`], in ENTITIES-section order. The
//! drawing layer of each entity is its `Layer` field. Features keep their
//! geometry in world coordinates and may lack one when it could not be built.

pub mod fields;

pub use fields::{field_index, FieldDefn, FieldType, FieldValue, SCHEMA};

use crate::document::Drawing;
use crate::error::Result;
use crate::geometry::{build_features, Geometry};
use crate::io::DRIVERS;
use crate::types::DxfVersion;
use fields::field_values;
use std::path::Path;

/// Name of the layer every drawing is read into
pub const ENTITIES_LAYER: &str = "entities";

/// One entity of a layer
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    fid: u64,
    geometry: Option<Geometry>,
    values: Vec<FieldValue>,
}

impl Feature {
    /// Sequence number within the layer
    pub fn fid(&self) -> u64 {
        self.fid
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Value of a schema field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        field_index(name).and_then(|i| self.values.get(i))
    }

    /// Field names and values in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        SCHEMA.iter().map(|f| f.name).zip(self.values.iter())
    }
}

/// Named group of features
#[derive(Debug, Clone, Default)]
pub struct SourceLayer {
    name: String,
    features: Vec<Feature>,
}

impl SourceLayer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

/// An opened drawing, exposed as layers of features
#[derive(Debug, Clone)]
pub struct DataSource {
    driver: &'static str,
    version: DxfVersion,
    layers: Vec<SourceLayer>,
}

impl DataSource {
    /// Open a drawing with the first registered driver that accepts it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (driver, drawing) = DRIVERS.open(path.as_ref())?;
        Ok(Self::from_drawing(driver, &drawing))
    }

    /// Build the layer of an already-read drawing
    pub fn from_drawing(driver: &'static str, drawing: &Drawing) -> Self {
        let features = build_features(drawing)
            .into_iter()
            .enumerate()
            .map(|(fid, placed)| Feature {
                fid: fid as u64,
                values: field_values(&placed),
                geometry: placed.geometry,
            })
            .collect();

        let source = DataSource {
            driver,
            version: drawing.version,
            layers: vec![SourceLayer {
                name: ENTITIES_LAYER.to_string(),
                features,
            }],
        };
        tracing::debug!(
            driver,
            layers = source.layers.len(),
            features = source.feature_count(),
            "data source opened"
        );
        source
    }

    /// Name of the driver that opened the drawing
    pub fn driver_name(&self) -> &'static str {
        self.driver
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&SourceLayer> {
        self.layers.get(index)
    }

    /// Layer by name (case-insensitive)
    pub fn layer_by_name(&self, name: &str) -> Option<&SourceLayer> {
        self.layers
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn layers(&self) -> &[SourceLayer] {
        &self.layers
    }

    /// Total number of features over all layers
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(SourceLayer::feature_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::*;
    use crate::types::Vector3;

    fn sample_drawing() -> Drawing {
        let mut drawing = Drawing::new();

        let mut block = Block::new("SIGN");
        let mut inner = Point::new();
        inner.common = EntityCommon::on_layer("Inner");
        block.entities.push(EntityType::Point(inner));
        drawing.add_block(block);

        let mut line = Line::from_points(Vector3::ZERO, Vector3::new(1.0, 1.0, 0.0));
        line.common = EntityCommon::on_layer("Roads");
        line.common.handle = Some("A1".into());
        drawing.add_entity(EntityType::Line(line));

        let mut text = Text::new();
        text.value = "Hello".into();
        drawing.add_entity(EntityType::Text(text));

        drawing.add_entity(EntityType::Insert(Insert::new("SIGN")));
        drawing
    }

    #[test]
    fn test_single_layer_in_file_order() {
        let source = DataSource::from_drawing("DXF", &sample_drawing());
        assert_eq!(source.layer_count(), 1);
        assert_eq!(source.layer(0).map(|l| l.name()), Some(ENTITIES_LAYER));
        assert!(source.layer_by_name("ENTITIES").is_some());
        assert!(source.layer_by_name("Roads").is_none());

        let layers: Vec<_> = source.layers()[0]
            .features()
            .map(|f| f.field("Layer").and_then(|v| v.as_str()).unwrap_or_default())
            .collect();
        assert_eq!(layers, ["Roads", "0", "Inner"]);
        let fids: Vec<_> = source.layers()[0].features().map(|f| f.fid()).collect();
        assert_eq!(fids, [0, 1, 2]);
    }

    #[test]
    fn test_feature_fields() {
        let source = DataSource::from_drawing("DXF", &sample_drawing());
        let mut features = source.layer(0).unwrap().features();

        let line = features.next().unwrap();
        assert_eq!(line.fid(), 0);
        assert_eq!(line.field("EntityHandle").and_then(|v| v.as_str()), Some("A1"));
        assert!(line.field("Text").unwrap().is_null());
        assert_eq!(line.fields().count(), SCHEMA.len());

        let text = features.next().unwrap();
        assert_eq!(text.field("Text").and_then(|v| v.as_str()), Some("Hello"));
        assert!(matches!(text.geometry(), Some(Geometry::Point(_))));
    }
}
