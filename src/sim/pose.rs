//! Element pose shared with the presentation layer

use glam::Vec2;

/// Where and how to draw a button, relative to its rest position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPose {
    /// Displacement from the rest centre (px)
    pub offset: Vec2,
    /// Rotation (degrees)
    pub rotation: f32,
    pub scale: f32,
}

impl ElementPose {
    pub fn at_rest(scale: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: 0.0,
            scale,
        }
    }

    /// Offset and rotation are both back at zero (scale is not considered)
    pub fn is_at_rest(&self) -> bool {
        self.offset == Vec2::ZERO && self.rotation == 0.0
    }

    /// CSS `transform` value for this pose
    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px) rotate({:.1}deg) scale({:.3})",
            self.offset.x, self.offset.y, self.rotation, self.scale
        )
    }
}

impl Default for ElementPose {
    fn default() -> Self {
        Self::at_rest(1.0)
    }
}
