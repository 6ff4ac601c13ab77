use std::ops::Range;

use crate::assets::TextureId;
use crate::coords::{Camera, Rect, Viewport};
use crate::scene::DrawCommand;

use super::uniforms::DrawUniforms;
use super::vertex::INDICES_PER_QUAD;

/// Scissor rect in target pixels, ready for `set_scissor_rect`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Converts a design-pixel clip rect to target pixels, clamped to the target.
///
/// `None` clips nothing and yields the full target. Returns `None` when the
/// result has zero area; the caller skips that draw call.
pub fn design_clip_to_scissor(clip: Option<Rect>, viewport: &Viewport) -> Option<ScissorRect> {
    let target_w = viewport.actual_screen_size.x.max(1.0) as u32;
    let target_h = viewport.actual_screen_size.y.max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, target_w, target_h),
        Some(r) => {
            let r = r.normalized();
            let min = viewport.to_screen(r.min());
            let max = viewport.to_screen(r.max());
            let x = (min.x.max(0.0) as u32).min(target_w);
            let y = (min.y.max(0.0) as u32).min(target_h);
            let x2 = (max.x.max(0.0).ceil() as u32).min(target_w);
            let y2 = (max.y.max(0.0).ceil() as u32).min(target_h);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some(ScissorRect::new(x, y, w, h)) }
}

/// One indexed draw of the sprite pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture: TextureId,
    /// Index into [`FramePlan::uniforms`].
    pub uniform_slot: u32,
    pub scissor: ScissorRect,
    /// Range in the static index buffer.
    pub indices: Range<u32>,
}

/// GPU-ready view of a frame's command list.
///
/// Built on the CPU only, so it can be tested without a device. Buffers are
/// reused across frames.
#[derive(Debug, Default, Clone)]
pub struct FramePlan {
    calls: Vec<DrawCall>,
    uniforms: Vec<DrawUniforms>,
    skipped: usize,
}

impl FramePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the plan for `commands` drawn through `viewport` and `camera`.
    ///
    /// Each command covers `[first_quad * 6, (first_quad + count) * 6)` of the
    /// index buffer, where `first_quad` is the running sum of earlier counts.
    /// Commands whose scissor is empty are dropped, but still advance the offset.
    /// Consecutive commands with equal uniforms share one uniform slot.
    pub fn rebuild(&mut self, commands: &[DrawCommand], viewport: &Viewport, camera: &Camera) {
        self.calls.clear();
        self.uniforms.clear();
        self.skipped = 0;

        let view_projection = viewport.model_view_projection(camera);
        let mut first_quad = 0u32;

        for cmd in commands {
            let start = first_quad * INDICES_PER_QUAD as u32;
            first_quad += cmd.count;
            let end = first_quad * INDICES_PER_QUAD as u32;

            let Some(scissor) = design_clip_to_scissor(cmd.options.scissor_rect, viewport) else {
                self.skipped += 1;
                continue;
            };

            let uniforms = DrawUniforms::new(view_projection, &cmd.options);
            if self.uniforms.last() != Some(&uniforms) {
                self.uniforms.push(uniforms);
            }
            let uniform_slot = (self.uniforms.len() - 1) as u32;

            self.calls.push(DrawCall {
                texture: cmd.texture,
                uniform_slot,
                scissor,
                indices: start..end,
            });
        }
    }

    #[inline]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    #[inline]
    pub fn uniforms(&self) -> &[DrawUniforms] {
        &self.uniforms
    }

    /// Commands dropped for an empty scissor in the last rebuild.
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Uniform blocks laid out `stride` bytes apart, as uploaded.
    pub fn uniform_bytes(&self, stride: u64) -> Vec<u8> {
        let stride = stride as usize;
        let mut bytes = vec![0u8; self.uniforms.len() * stride];
        for (i, u) in self.uniforms.iter().enumerate() {
            let block = bytemuck::bytes_of(u);
            bytes[i * stride..i * stride + block.len()].copy_from_slice(block);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::scene::{DrawOptions, Effect};

    fn offscreen() -> Viewport {
        Viewport::offscreen(Vec2::new(320.0, 180.0))
    }

    fn cmd(texture: u32, count: u32, options: DrawOptions) -> DrawCommand {
        DrawCommand { texture: TextureId(texture), options, count }
    }

    // ── scissor ───────────────────────────────────────────────────────────

    #[test]
    fn no_clip_covers_whole_target() {
        assert_eq!(design_clip_to_scissor(None, &offscreen()), Some(ScissorRect::new(0, 0, 320, 180)));
    }

    #[test]
    fn clip_is_clamped_to_target() {
        let s = design_clip_to_scissor(Some(Rect::new(300.0, -10.0, 50.0, 30.0)), &offscreen());
        assert_eq!(s, Some(ScissorRect::new(300, 0, 20, 20)));
    }

    #[test]
    fn clip_outside_target_is_empty() {
        assert_eq!(design_clip_to_scissor(Some(Rect::new(400.0, 0.0, 10.0, 10.0)), &offscreen()), None);
        assert_eq!(design_clip_to_scissor(Some(Rect::new(10.0, 10.0, 0.0, 5.0)), &offscreen()), None);
    }

    #[test]
    fn clip_scales_with_viewport() {
        let vp = Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(1600.0, 720.0));
        let s = design_clip_to_scissor(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), &vp);
        assert_eq!(s, Some(ScissorRect::new(160, 0, 40, 40)));
    }

    // ── offsets ───────────────────────────────────────────────────────────

    #[test]
    fn index_ranges_follow_running_quad_offsets() {
        let mut plan = FramePlan::new();
        let cmds = [
            cmd(1, 3, DrawOptions::IDENTITY),
            cmd(2, 1, DrawOptions::IDENTITY),
            cmd(1, 2, DrawOptions::IDENTITY),
        ];
        plan.rebuild(&cmds, &offscreen(), &Camera::default());

        let ranges: Vec<_> = plan.calls().iter().map(|c| c.indices.clone()).collect();
        assert_eq!(ranges, [0..18, 18..24, 24..36]);
        let textures: Vec<_> = plan.calls().iter().map(|c| c.texture.0).collect();
        assert_eq!(textures, [1, 2, 1]);
    }

    #[test]
    fn empty_scissor_skips_call_but_keeps_offsets() {
        let hidden = DrawOptions::scissor(Rect::new(0.0, 0.0, 0.0, 0.0));
        let cmds = [
            cmd(1, 2, DrawOptions::IDENTITY),
            cmd(1, 5, hidden),
            cmd(1, 1, DrawOptions::effect(Effect::Invert)),
        ];
        let mut plan = FramePlan::new();
        plan.rebuild(&cmds, &offscreen(), &Camera::default());

        assert_eq!(plan.calls().len(), 2);
        assert_eq!(plan.skipped(), 1);
        assert_eq!(plan.calls()[1].indices, 42..48);
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn consecutive_equal_uniforms_share_a_slot() {
        let cmds = [
            cmd(1, 1, DrawOptions::IDENTITY),
            cmd(2, 1, DrawOptions::IDENTITY),
            cmd(3, 1, DrawOptions::alpha(0.5)),
            cmd(4, 1, DrawOptions::IDENTITY),
        ];
        let mut plan = FramePlan::new();
        plan.rebuild(&cmds, &offscreen(), &Camera::default());

        let slots: Vec<_> = plan.calls().iter().map(|c| c.uniform_slot).collect();
        assert_eq!(slots, [0, 0, 1, 2]);
        assert_eq!(plan.uniforms().len(), 3);
        assert_eq!(plan.uniforms()[1].alpha, 0.5);
    }

    #[test]
    fn uniform_bytes_are_strided() {
        let cmds = [cmd(1, 1, DrawOptions::IDENTITY), cmd(1, 1, DrawOptions::alpha(0.5))];
        let mut plan = FramePlan::new();
        plan.rebuild(&cmds, &offscreen(), &Camera::default());

        let bytes = plan.uniform_bytes(256);
        assert_eq!(bytes.len(), 512);
        assert_eq!(&bytes[256 + 64..256 + 68], &0.5f32.to_ne_bytes());
        assert!(bytes[80..256].iter().all(|&b| b == 0));
    }

    #[test]
    fn rebuild_discards_previous_frame() {
        let mut plan = FramePlan::new();
        plan.rebuild(&[cmd(1, 4, DrawOptions::IDENTITY)], &offscreen(), &Camera::default());
        plan.rebuild(&[], &offscreen(), &Camera::default());
        assert!(plan.calls().is_empty());
        assert!(plan.uniforms().is_empty());
    }
}
