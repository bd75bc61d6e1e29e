//! Filled quadrilaterals: SOLID, TRACE and 3DFACE

use super::EntityCommon;
use crate::types::Vector3;

/// Which entity a [`Face`] was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceKind {
    #[default]
    Solid,
    Trace,
    Face3D,
}

impl FaceKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FaceKind::Solid => "SOLID",
            FaceKind::Trace => "TRACE",
            FaceKind::Face3D => "3DFACE",
        }
    }
}

/// Three or four corner points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub common: EntityCommon,
    pub kind: FaceKind,
    /// Corners as stored (codes 10..13); a triangle repeats its third corner
    pub corners: [Vector3; 4],
}

impl Face {
    pub fn new(kind: FaceKind) -> Self {
        Face {
            kind,
            ..Self::default()
        }
    }

    /// Closed outline ring
    ///
    /// SOLID and TRACE store their corners in "Z" order (1, 2, 4, 3).
    pub fn ring(&self) -> Vec<Vector3> {
        let [a, b, c, d] = self.corners;
        let mut ring = match self.kind {
            FaceKind::Solid | FaceKind::Trace => vec![a, b, d, c],
            FaceKind::Face3D => vec![a, b, c, d],
        };
        ring.dedup();
        if ring.first() != ring.last() {
            ring.push(a);
        }
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_ring_order() {
        let mut solid = Face::new(FaceKind::Solid);
        solid.corners = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        ];
        let ring = solid.ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[2], Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn test_triangle_face() {
        let mut face = Face::new(FaceKind::Face3D);
        let c = Vector3::new(0.0, 1.0, 0.0);
        face.corners = [Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0), c, c];
        assert_eq!(face.ring().len(), 4);
    }
}
