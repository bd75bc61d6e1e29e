//! Hatch entity and its boundary paths

use super::{EntityCommon, LwVertex};
use crate::types::Vector2;
use bitflags::bitflags;

bitflags! {
    /// Boundary path type flags (group code 92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BoundaryPathFlags: i32 {
        const EXTERNAL = 1;
        const POLYLINE = 2;
        const DERIVED = 4;
        const TEXTBOX = 8;
        const OUTERMOST = 16;
    }
}

/// One edge of an edge-defined boundary path (OCS)
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line {
        start: Vector2,
        end: Vector2,
    },
    /// Angles in degrees
    Arc {
        center: Vector2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    /// Angles in degrees; `major_axis` is relative to the center
    Ellipse {
        center: Vector2,
        major_axis: Vector2,
        ratio: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    Spline {
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Vector2>,
        weights: Vec<f64>,
        fit_points: Vec<Vector2>,
    },
}

/// Geometry of a boundary path
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryPathKind {
    Polyline { vertices: Vec<LwVertex>, closed: bool },
    Edges(Vec<BoundaryEdge>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPath {
    pub flags: BoundaryPathFlags,
    pub kind: BoundaryPathKind,
}

/// Filled or patterned area bounded by one or more loops
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hatch {
    pub common: EntityCommon,
    /// OCS elevation of every boundary
    pub elevation: f64,
    pub pattern_name: String,
    pub solid_fill: bool,
    pub paths: Vec<BoundaryPath>,
}

impl Hatch {
    pub fn new() -> Self {
        Self::default()
    }
}
