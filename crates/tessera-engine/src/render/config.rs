use crate::coords::Vec2;
use crate::paint::Color;

/// Construction parameters for [`SpriteRenderer`](super::SpriteRenderer).
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Fixed logical resolution all drawing targets, in pixels.
    pub design_resolution: Vec2,

    /// Maximum sprites per frame. Sizes the vertex stream and the static index buffer.
    pub sprite_capacity: usize,

    /// Clear color of the offscreen target.
    pub clear_color: Color,

    /// Color of the bars around the scaled image.
    pub letterbox_color: Color,

    /// Sampling filter for sprites and for the final upscale.
    ///
    /// `Nearest` keeps pixel art crisp.
    pub filter: wgpu::FilterMode,

    /// Flip V when presenting the offscreen target.
    ///
    /// Only needed for backends whose render-target origin is bottom-left while
    /// texture origin is top-left. wgpu uses top-left for both.
    pub offscreen_flip_v: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            design_resolution: Vec2::new(320.0, 180.0),
            sprite_capacity: 4096,
            clear_color: Color::from_rgba8(20, 20, 28, 255),
            letterbox_color: Color::BLACK,
            filter: wgpu::FilterMode::Nearest,
            offscreen_flip_v: false,
        }
    }
}

impl RendererConfig {
    /// Offscreen target size in whole pixels, at least 1x1.
    pub fn design_extent(&self) -> (u32, u32) {
        let w = self.design_resolution.x.round().max(1.0) as u32;
        let h = self.design_resolution.y.round().max(1.0) as u32;
        (w, h)
    }
}
