//! Polyline entities
//!
//! `LWPOLYLINE` stores planar vertices inline; the older `POLYLINE` is
//! followed by `VERTEX` records and a `SEQEND`, and also encodes 3D
//! polylines, polygon meshes and polyface meshes.

use super::EntityCommon;
use crate::types::{Vector2, Vector3};
use bitflags::bitflags;

bitflags! {
    /// POLYLINE / LWPOLYLINE flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
        const CURVE_FIT = 2;
        const SPLINE_FIT = 4;
        const POLYLINE_3D = 8;
        const POLYGON_MESH = 16;
        const MESH_CLOSED_N = 32;
        const POLYFACE_MESH = 64;
        const CONTINUOUS_LINETYPE = 128;
    }
}

bitflags! {
    /// VERTEX flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexFlags: i16 {
        const EXTRA_VERTEX = 1;
        const CURVE_FIT_TANGENT = 2;
        const SPLINE_VERTEX = 8;
        const SPLINE_FRAME = 16;
        const POLYLINE_3D = 32;
        const POLYGON_MESH = 64;
        const POLYFACE_MESH = 128;
    }
}

/// Vertex of a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LwVertex {
    /// Location in OCS
    pub location: Vector2,
    /// Tangent of a quarter of the included angle of the following segment
    pub bulge: f64,
}

impl LwVertex {
    pub fn new(x: f64, y: f64) -> Self {
        LwVertex {
            location: Vector2::new(x, y),
            bulge: 0.0,
        }
    }
}

/// Lightweight (planar) polyline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LwPolyline {
    pub common: EntityCommon,
    pub flags: PolylineFlags,
    /// OCS elevation of every vertex
    pub elevation: f64,
    pub vertices: Vec<LwVertex>,
}

impl LwPolyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }
}

/// A `VERTEX` record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub location: Vector3,
    pub bulge: f64,
    pub flags: VertexFlags,
    /// Polyface face record indices (1-based, negative when the edge is hidden)
    pub indices: [i32; 4],
}

impl Vertex {
    pub fn new(location: Vector3) -> Self {
        Vertex {
            location,
            ..Self::default()
        }
    }

    /// Polyface records flagged 128 without 64 describe a face, not a point
    pub fn is_face_record(&self) -> bool {
        self.flags.contains(VertexFlags::POLYFACE_MESH)
            && !self.flags.contains(VertexFlags::POLYGON_MESH)
    }
}

/// Heavy polyline with its vertex sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub common: EntityCommon,
    pub flags: PolylineFlags,
    /// Z of the dummy point (group 30), the elevation of 2D polylines
    pub elevation: f64,
    pub vertices: Vec<Vertex>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }

    pub fn is_polyface_mesh(&self) -> bool {
        self.flags.contains(PolylineFlags::POLYFACE_MESH)
    }

    pub fn is_polygon_mesh(&self) -> bool {
        self.flags.contains(PolylineFlags::POLYGON_MESH)
    }

    /// 2D polylines live in their OCS; 3D polylines and meshes are in WCS
    pub fn is_planar(&self) -> bool {
        !self.flags.intersects(
            PolylineFlags::POLYLINE_3D
                | PolylineFlags::POLYGON_MESH
                | PolylineFlags::POLYFACE_MESH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_kinds() {
        let mut pl = Polyline::new();
        assert!(pl.is_planar());
        pl.flags = PolylineFlags::from_bits_truncate(64);
        assert!(pl.is_polyface_mesh());
        assert!(!pl.is_planar());
    }

    #[test]
    fn test_face_record() {
        let mut v = Vertex::new(Vector3::ZERO);
        v.flags = VertexFlags::POLYFACE_MESH;
        assert!(v.is_face_record());
        v.flags |= VertexFlags::POLYGON_MESH;
        assert!(!v.is_face_record());
    }
}
