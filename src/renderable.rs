use glam::Vec2;

/// # Renderable
///
/// Draw primitive attached to a game object (sprite, text, shape...). The primitives themselves
/// live in the renderer; the scene only drives their per-frame update and release.
pub trait Renderable {
    /// Returns the unscaled size of the primitive.
    fn size(&self) -> Vec2;

    /// Returns the normalized anchor point.
    fn anchor(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Advances the primitive by `dt` milliseconds. Only called while the owner is visible.
    fn update(&mut self, _dt: f32) {}

    /// Releases the primitive's resources. Called once when the owner is destroyed.
    fn destroy(&mut self) {}
}

/// # Debug Axis
///
/// Overlay drawn at the origin of every object while debug mode is on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DebugAxis {
    /// Length of each axis line.
    pub length: f32,
    /// Color of the x axis as RGB.
    pub x_color: u32,
    /// Color of the y axis as RGB.
    pub y_color: u32,
}

impl DebugAxis {
    /// Default overlay: red x axis, green y axis.
    pub const DEFAULT: Self = Self {
        length: 20.0,
        x_color: 0xff0000,
        y_color: 0x00ff00,
    };
}

impl Default for DebugAxis {
    fn default() -> Self {
        Self::DEFAULT
    }
}
