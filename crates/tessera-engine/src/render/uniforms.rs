use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::scene::{DrawOptions, Effect};

/// Per-draw-call uniform block, mirrored by `DrawUniforms` in `sprite.wgsl`.
///
/// 80 bytes; each call's copy sits at its own dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub mvp: [[f32; 4]; 4],
    pub alpha: f32,
    pub sepia: u32,
    pub retro: u32,
    pub invert: u32,
}

impl DrawUniforms {
    pub const SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

    /// The camera's view-projection plus the resolved alpha and exactly one
    /// effect flag (or none). Scope affines are already in the vertices.
    pub fn new(view_projection: Mat4, options: &DrawOptions) -> Self {
        let effect = options.resolved_effect();
        Self {
            mvp: view_projection.to_cols_array_2d(),
            alpha: options.resolved_alpha(),
            sepia: (effect == Effect::Sepia) as u32,
            retro: (effect == Effect::Retro) as u32,
            invert: (effect == Effect::Invert) as u32,
        }
    }

    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(Self::SIZE).unwrap_or(std::num::NonZeroU64::MIN)
    }
}

/// Rounds `size` up to a multiple of `alignment` (a power of two, as wgpu limits are).
#[inline]
pub fn align_to(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Distance between consecutive uniform blocks in the dynamic uniform buffer.
#[inline]
pub fn uniform_stride(limits: &wgpu::Limits) -> u64 {
    align_to(DrawUniforms::SIZE, limits.min_uniform_buffer_offset_alignment as u64)
}
