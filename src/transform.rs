use glam::Affine2;
use glam::Vec2;

/// # Local Transform
///
/// Position, rotation (radians), and scale of an object relative to its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalTransform {
    /// Position of the transform.
    pub position: Vec2,
    /// Rotation of the transform.
    pub rotation: f32,
    /// Scale of the transform.
    pub scale: Vec2,
}

impl LocalTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    /// Returns a transform with the given position, rotation, and scale.
    pub const fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Returns a transform with the given position.
    pub const fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Returns the transform as an affine matrix.
    pub fn affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// # World Transform
///
/// Transform of an object in world coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldTransform {
    /// Transform matrix.
    pub matrix: Affine2,
    /// Accumulated rotation in radians.
    pub rotation: f32,
}

impl WorldTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: Affine2::IDENTITY,
        rotation: 0.0,
    };

    /// Returns the parent transform composed with the given local transform.
    pub fn then(&self, local: &LocalTransform) -> Self {
        Self {
            matrix: self.matrix * local.affine(),
            rotation: self.rotation + local.rotation,
        }
    }

    /// Returns the world position.
    pub fn position(&self) -> Vec2 {
        self.matrix.translation
    }

    /// Converts a world point into this transform's local space. Returns None when the transform
    /// collapses space, as a zero scale does.
    pub fn to_local(&self, point: Vec2) -> Option<Vec2> {
        let determinant = self.matrix.matrix2.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return None;
        }

        Some(self.matrix.inverse().transform_point2(point))
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
