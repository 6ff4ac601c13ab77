use crate::coords::Vec2;

/// Opaque texture handle issued by the asset cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Four UV corners in winding order TL, BL, BR, TR.
///
/// Atlases may store a region rotated or mirrored, so the corners are not
/// required to describe an axis-aligned rectangle in that order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvQuad {
    pub corners: [Vec2; 4],
}

impl UvQuad {
    /// The whole texture.
    pub const FULL: UvQuad = UvQuad::from_rect(0.0, 0.0, 1.0, 1.0);

    /// Axis-aligned region `[u0, u1] x [v0, v1]`.
    #[inline]
    pub const fn from_rect(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self {
            corners: [
                Vec2::new(u0, v0),
                Vec2::new(u0, v1),
                Vec2::new(u1, v1),
                Vec2::new(u1, v0),
            ],
        }
    }

    /// Region given in texels of a `texture_size` texture.
    pub fn from_pixels(x: f32, y: f32, w: f32, h: f32, texture_size: Vec2) -> Self {
        Self::from_rect(
            x / texture_size.x,
            y / texture_size.y,
            (x + w) / texture_size.x,
            (y + h) / texture_size.y,
        )
    }

    /// Corners for an image the atlas packer stored rotated a quarter turn
    /// clockwise inside this region, so that it still displays upright.
    #[inline]
    pub fn stored_rotated_cw(self) -> Self {
        let [tl, bl, br, tr] = self.corners;
        Self { corners: [tr, tl, bl, br] }
    }
}

/// What a material shows at one instant: texture, UV quad and pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialFrame {
    pub texture: TextureId,
    pub uv: UvQuad,
    pub pixel_size: Vec2,
}

impl MaterialFrame {
    #[inline]
    pub const fn new(texture: TextureId, uv: UvQuad, pixel_size: Vec2) -> Self {
        Self { texture, uv, pixel_size }
    }
}

/// A drawable region, static or animated.
///
/// Resolved to a [`MaterialFrame`] once per sprite before any vertex is written.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Static(MaterialFrame),
    Animated {
        frames: Vec<MaterialFrame>,
        /// Seconds each frame stays on screen.
        frame_duration: f32,
        looping: bool,
    },
}

impl Material {
    /// Frame visible `elapsed` seconds after the animation started.
    ///
    /// Non-looping animations hold their last frame. Returns `None` only for an
    /// animation without frames.
    pub fn frame_at(&self, elapsed: f32) -> Option<&MaterialFrame> {
        match self {
            Material::Static(frame) => Some(frame),
            Material::Animated { frames, frame_duration, looping } => {
                if frames.is_empty() {
                    return None;
                }
                let step = if *frame_duration > 0.0 && elapsed.is_finite() && elapsed > 0.0 {
                    (elapsed / frame_duration) as usize
                } else {
                    0
                };
                let index = if *looping { step % frames.len() } else { step.min(frames.len() - 1) };
                frames.get(index)
            }
        }
    }

    pub fn frame_count(&self) -> usize {
        match self {
            Material::Static(_) => 1,
            Material::Animated { frames, .. } => frames.len(),
        }
    }
}

/// Lookup interface of the external asset cache.
pub trait MaterialSource {
    fn material(&self, key: &str) -> Option<&Material>;
}

impl<S: MaterialSource + ?Sized> MaterialSource for &S {
    #[inline]
    fn material(&self, key: &str) -> Option<&Material> {
        (**self).material(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u32) -> MaterialFrame {
        MaterialFrame::new(TextureId(id), UvQuad::FULL, Vec2::new(16.0, 16.0))
    }

    // ── UvQuad ────────────────────────────────────────────────────────────

    #[test]
    fn from_rect_lists_corners_in_winding_order() {
        let q = UvQuad::from_rect(0.25, 0.5, 0.75, 1.0);
        assert_eq!(q.corners[0], Vec2::new(0.25, 0.5));
        assert_eq!(q.corners[1], Vec2::new(0.25, 1.0));
        assert_eq!(q.corners[2], Vec2::new(0.75, 1.0));
        assert_eq!(q.corners[3], Vec2::new(0.75, 0.5));
    }

    #[test]
    fn from_pixels_normalizes_by_texture_size() {
        let q = UvQuad::from_pixels(32.0, 0.0, 32.0, 16.0, Vec2::new(128.0, 64.0));
        assert_eq!(q, UvQuad::from_rect(0.25, 0.0, 0.5, 0.25));
    }

    #[test]
    fn rotated_storage_starts_at_region_top_right() {
        let q = UvQuad::from_rect(0.0, 0.0, 1.0, 1.0).stored_rotated_cw();
        assert_eq!(q.corners[0], Vec2::new(1.0, 0.0));
        assert_eq!(q.corners[1], Vec2::new(0.0, 0.0));
    }

    // ── Material::frame_at ────────────────────────────────────────────────

    #[test]
    fn static_material_ignores_time() {
        let m = Material::Static(frame(1));
        assert_eq!(m.frame_at(100.0), Some(&frame(1)));
    }

    #[test]
    fn looping_animation_wraps() {
        let m = Material::Animated { frames: vec![frame(1), frame(2), frame(3)], frame_duration: 0.1, looping: true };
        assert_eq!(m.frame_at(0.0).map(|f| f.texture), Some(TextureId(1)));
        assert_eq!(m.frame_at(0.15).map(|f| f.texture), Some(TextureId(2)));
        assert_eq!(m.frame_at(0.35).map(|f| f.texture), Some(TextureId(1)));
    }

    #[test]
    fn one_shot_animation_holds_last_frame() {
        let m = Material::Animated { frames: vec![frame(1), frame(2)], frame_duration: 0.5, looping: false };
        assert_eq!(m.frame_at(10.0).map(|f| f.texture), Some(TextureId(2)));
    }

    #[test]
    fn empty_animation_has_no_frame() {
        let m = Material::Animated { frames: vec![], frame_duration: 0.5, looping: true };
        assert!(m.frame_at(0.0).is_none());
    }
}
