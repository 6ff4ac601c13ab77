use super::Vec2;

/// 2D camera applied on top of the viewport projection.
///
/// `zoom > 1` magnifies the scene, `zoom < 1` shows more of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
}

impl Camera {
    #[inline]
    pub const fn new(position: Vec2, zoom: f32) -> Self {
        Self { position, zoom }
    }

    /// Zoom factor safe to divide by.
    #[inline]
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    /// Maps a point on the offscreen target (design pixels) to world space.
    #[inline]
    pub fn to_world(&self, design: Vec2) -> Vec2 {
        design / self.effective_zoom() + self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self { position: Vec2::ZERO, zoom: 1.0 }
    }
}
