use glam::{Mat4, Vec3};
use std::ops::Mul;

/// Affine transform backed by a 4x4 matrix
///
/// Builder methods post-multiply, so
/// `Transform::IDENTITY.translate(t).rotate_z(a).scale(s)` is T·R·S and
/// applies the scale first when transforming a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn translation(offset: Vec3) -> Self {
        Self::from_matrix(Mat4::from_translation(offset))
    }

    /// Counter-clockwise rotation about +Z, in radians
    pub fn rotation_z(angle: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_z(angle))
    }

    pub fn scaling(factors: Vec3) -> Self {
        Self::from_matrix(Mat4::from_scale(factors))
    }

    pub fn translate(self, offset: Vec3) -> Self {
        self * Self::translation(offset)
    }

    pub fn rotate_z(self, angle: f32) -> Self {
        self * Self::rotation_z(angle)
    }

    pub fn scale(self, factors: Vec3) -> Self {
        self * Self::scaling(factors)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Column-major layout, ready for a uniform buffer
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.matrix.to_cols_array_2d()
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform::from_matrix(self.matrix * rhs.matrix)
    }
}
