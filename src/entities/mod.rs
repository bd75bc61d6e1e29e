//! Drawing entities read from the ENTITIES and BLOCKS sections
//!
//! Only the entity kinds that carry vector geometry worth exporting are
//! modelled. Each entity struct embeds an [`EntityCommon`] with the data
//! every entity shares (handle, layer, line type, subclass markers, paper
//! space flag and extrusion direction).

use crate::types::Vector3;

pub mod curve;
pub mod face;
pub mod hatch;
pub mod insert;
pub mod polyline;
pub mod text;

pub use curve::{Arc, Circle, Ellipse, Line, Point, Spline, SplineFlags};
pub use face::{Face, FaceKind};
pub use hatch::{BoundaryEdge, BoundaryPath, BoundaryPathFlags, BoundaryPathKind, Hatch};
pub use insert::{Block, Dimension, Insert};
pub use polyline::{LwPolyline, LwVertex, Polyline, PolylineFlags, Vertex, VertexFlags};
pub use text::{MText, Text};

/// Data shared by every entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Entity handle as written in the file (hex)
    pub handle: Option<String>,
    /// Layer name
    pub layer: String,
    /// Line type name, `None` when BYLAYER is implied
    pub line_type: Option<String>,
    /// Subclass markers (group code 100) in file order
    pub subclasses: Vec<String>,
    /// Entity lives in paper space (group code 67)
    pub paper_space: bool,
    /// Extrusion direction defining the object coordinate system
    pub extrusion: Vector3,
}

impl EntityCommon {
    /// Create common data on layer "0"
    pub fn new() -> Self {
        EntityCommon {
            handle: None,
            layer: "0".to_string(),
            line_type: None,
            subclasses: Vec::new(),
            paper_space: false,
            extrusion: Vector3::UNIT_Z,
        }
    }

    /// Create common data on the given layer
    pub fn on_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Every entity kind the reader understands
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Spline(Spline),
    LwPolyline(LwPolyline),
    Polyline(Polyline),
    Text(Text),
    MText(MText),
    Face(Face),
    Hatch(Hatch),
    Insert(Insert),
    Dimension(Dimension),
}

impl EntityType {
    /// Shared entity data
    pub fn common(&self) -> &EntityCommon {
        match self {
            EntityType::Point(e) => &e.common,
            EntityType::Line(e) => &e.common,
            EntityType::Circle(e) => &e.common,
            EntityType::Arc(e) => &e.common,
            EntityType::Ellipse(e) => &e.common,
            EntityType::Spline(e) => &e.common,
            EntityType::LwPolyline(e) => &e.common,
            EntityType::Polyline(e) => &e.common,
            EntityType::Text(e) => &e.common,
            EntityType::MText(e) => &e.common,
            EntityType::Face(e) => &e.common,
            EntityType::Hatch(e) => &e.common,
            EntityType::Insert(e) => &e.common,
            EntityType::Dimension(e) => &e.common,
        }
    }

    /// DXF type name
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityType::Point(_) => "POINT",
            EntityType::Line(_) => "LINE",
            EntityType::Circle(_) => "CIRCLE",
            EntityType::Arc(_) => "ARC",
            EntityType::Ellipse(_) => "ELLIPSE",
            EntityType::Spline(_) => "SPLINE",
            EntityType::LwPolyline(_) => "LWPOLYLINE",
            EntityType::Polyline(_) => "POLYLINE",
            EntityType::Text(t) if t.tag.is_some() => "ATTRIB",
            EntityType::Text(_) => "TEXT",
            EntityType::MText(_) => "MTEXT",
            EntityType::Face(f) => f.kind.type_name(),
            EntityType::Hatch(_) => "HATCH",
            EntityType::Insert(_) => "INSERT",
            EntityType::Dimension(_) => "DIMENSION",
        }
    }

    /// Text carried by the entity, if it is a text-like entity
    pub fn text(&self) -> Option<String> {
        match self {
            EntityType::Text(t) => Some(t.value.clone()),
            EntityType::MText(t) => Some(t.plain_text()),
            _ => None,
        }
    }
}
