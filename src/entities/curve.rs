//! Point and curve entities

use super::EntityCommon;
use crate::types::Vector3;
use bitflags::bitflags;

/// A single point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub common: EntityCommon,
    pub location: Vector3,
}

impl Point {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A line entity defined by two endpoints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point of the line
    pub start: Vector3,
    /// End point of the line
    pub end: Vector3,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }
}

/// Full circle; the center is in the entity's OCS
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    pub common: EntityCommon,
    pub center: Vector3,
    pub radius: f64,
}

impl Circle {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Circular arc, swept counter-clockwise from `start_angle` to `end_angle`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arc {
    pub common: EntityCommon,
    /// Center in OCS
    pub center: Vector3,
    pub radius: f64,
    /// Degrees
    pub start_angle: f64,
    /// Degrees
    pub end_angle: f64,
}

impl Arc {
    pub fn new() -> Self {
        Arc {
            end_angle: 360.0,
            ..Self::default()
        }
    }
}

/// Ellipse or elliptical arc (WCS)
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub common: EntityCommon,
    pub center: Vector3,
    /// Endpoint of the major axis, relative to the center
    pub major_axis: Vector3,
    /// Minor to major axis ratio
    pub ratio: f64,
    /// Start parameter in radians (0 for a full ellipse)
    pub start_param: f64,
    /// End parameter in radians (2π for a full ellipse)
    pub end_param: f64,
}

impl Ellipse {
    pub fn new() -> Self {
        Ellipse {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            major_axis: Vector3::new(1.0, 0.0, 0.0),
            ratio: 1.0,
            start_param: 0.0,
            end_param: std::f64::consts::TAU,
        }
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    /// SPLINE flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SplineFlags: i16 {
        const CLOSED = 1;
        const PERIODIC = 2;
        const RATIONAL = 4;
        const PLANAR = 8;
        const LINEAR = 16;
    }
}

/// NURBS curve (WCS)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spline {
    pub common: EntityCommon,
    pub flags: SplineFlags,
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Vector3>,
    /// One weight per control point when the curve is rational
    pub weights: Vec<f64>,
    pub fit_points: Vec<Vector3>,
}

impl Spline {
    pub fn new() -> Self {
        Spline {
            degree: 3,
            ..Self::default()
        }
    }
}
