//! Affine transforms for placing entities in world coordinates
//!
//! Block references and object coordinate systems are both expressed as a
//! [`Transform`] over a homogeneous 4x4 matrix.

use crate::types::Vector3;
use nalgebra::Matrix4;

/// Arbitrary axis algorithm threshold (1/64)
const ARBITRARY_AXIS_THRESHOLD: f64 = 1.0 / 64.0;

/// A 3D affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `offset`
    pub fn from_translation(offset: Vector3) -> Self {
        let offset: nalgebra::Vector3<f64> = offset.into();
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Non-uniform scaling about the origin
    pub fn from_scaling(scale: Vector3) -> Self {
        let scale: nalgebra::Vector3<f64> = scale.into();
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Rotation about the Z axis (radians, counter-clockwise)
    pub fn from_rotation_z(angle: f64) -> Self {
        Self {
            matrix: Matrix4::new_rotation(nalgebra::Vector3::new(0.0, 0.0, angle)),
        }
    }

    /// Object coordinate system to world coordinates for the given extrusion
    ///
    /// Implements the AutoCAD arbitrary axis algorithm.
    pub fn from_extrusion(normal: Vector3) -> Self {
        let normal = normal.normalize();
        if normal == Vector3::UNIT_Z || normal.length() == 0.0 {
            return Self::identity();
        }

        let ax = if normal.x.abs() < ARBITRARY_AXIS_THRESHOLD
            && normal.y.abs() < ARBITRARY_AXIS_THRESHOLD
        {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            Vector3::UNIT_Z
        };
        let x_dir = ax.cross(&normal).normalize();
        let y_dir = normal.cross(&x_dir).normalize();

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            x_dir.x, y_dir.x, normal.x, 0.0,
            x_dir.y, y_dir.y, normal.y, 0.0,
            x_dir.z, y_dir.z, normal.z, 0.0,
            0.0,     0.0,     0.0,      1.0,
        );
        Self { matrix }
    }

    /// Compose: `self` is applied first, then `next`
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Apply the transform to a point
    pub fn apply(&self, point: Vector3) -> Vector3 {
        let point: nalgebra::Point3<f64> = point.into();
        self.matrix.transform_point(&point).into()
    }

    /// True when applying the transform leaves every point unchanged
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).length() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_translation_then_rotation() {
        let t = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0))
            .then(&Transform::from_rotation_z(FRAC_PI_2));
        assert_close(t.apply(Vector3::ZERO), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_scaling() {
        let t = Transform::from_scaling(Vector3::new(2.0, 3.0, 1.0));
        assert_close(t.apply(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_default_extrusion_is_identity() {
        assert!(Transform::from_extrusion(Vector3::UNIT_Z).is_identity());
    }

    #[test]
    fn test_flipped_extrusion_mirrors_x() {
        let t = Transform::from_extrusion(Vector3::new(0.0, 0.0, -1.0));
        assert_close(t.apply(Vector3::new(5.0, 2.0, 0.0)), Vector3::new(-5.0, 2.0, 0.0));
    }
}
