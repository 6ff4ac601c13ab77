//! Sprite vertex layout and quad packing.
//!
//! Layout (20 bytes per vertex):
//!
//!  offset  0  position  [f32; 2]   Float32x2   loc 0
//!  offset  8  uv        [u16; 2]   Unorm16x2   loc 1
//!  offset 12  color     u32        Unorm8x4    loc 2   (RGBA8, r at the lowest address)
//!  offset 16  flags     u32        Uint32      loc 3
//!
//! UVs are quantized to 16-bit normalized integers. That trades sub-texel precision
//! (1/65535 of the texture) for half the UV bandwidth, which is far below one texel
//! for any atlas that fits in a GPU texture.
//!
//! Every quad is four vertices in winding order TL, BL, BR, TR. Rotation and
//! mirroring only change which material corner lands on which screen corner, so
//! the shared index pattern always triangulates the same way.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

use crate::assets::UvQuad;
use crate::coords::{AffineTransform, Vec2};
use crate::paint::Color;
use crate::paint::color::unorm8;

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Byte stride between consecutive vertices.
pub const VERTEX_STRIDE: usize = std::mem::size_of::<SpriteVertex>();

/// Unit quad centered at the origin, in winding order.
pub const UNIT_QUAD: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(-0.5, 0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(0.5, -0.5),
];

bitflags! {
    /// Per-vertex switches read by the fragment shader.
    ///
    /// Only these two bits exist; the remaining bits are always zero.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct VertexFlags: u32 {
        /// Multiply texel RGB by the vertex color.
        const USE_COLOR = 1 << 0;
        /// Multiply texel alpha by the vertex color's alpha.
        const USE_ALPHA = 1 << 1;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [u16; 2],
    pub color: u32,
    pub flags: u32,
}

impl SpriteVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Unorm16x2, // uv
        2 => Unorm8x4,  // color
        3 => Uint32     // flags
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    #[inline]
    pub fn new(position: Vec2, uv: Vec2, color: [u8; 4], flags: VertexFlags) -> Self {
        Self {
            position: position.to_array(),
            uv: [quantize_uv(uv.x), quantize_uv(uv.y)],
            color: pack_color(color),
            flags: flags.bits(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }

    #[inline]
    pub fn uv(&self) -> Vec2 {
        Vec2::new(dequantize_uv(self.uv[0]), dequantize_uv(self.uv[1]))
    }

    #[inline]
    pub fn color_rgba8(&self) -> [u8; 4] {
        self.color.to_ne_bytes()
    }

    #[inline]
    pub fn vertex_flags(&self) -> VertexFlags {
        VertexFlags::from_bits_truncate(self.flags)
    }
}

/// Quantizes a `[0, 1]` texture coordinate to a 16-bit normalized integer.
#[inline]
pub fn quantize_uv(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

#[inline]
pub fn dequantize_uv(v: u16) -> f32 {
    v as f32 / u16::MAX as f32
}

/// Packs RGBA8 so that memory order is r, g, b, a on every host, which is what
/// `Unorm8x4` reads.
#[inline]
pub fn pack_color(rgba: [u8; 4]) -> u32 {
    u32::from_ne_bytes(rgba)
}

/// Builds the four vertices of one sprite.
///
/// Corners of the unit quad are scaled by `affine.scale` and offset by
/// `affine.translation`; rotation and mirroring permute the material's UV corners.
pub fn sprite_quad(
    affine: &AffineTransform,
    uv: &UvQuad,
    color: Option<Color>,
    alpha: Option<f32>,
) -> [SpriteVertex; VERTICES_PER_QUAD] {
    let mut flags = VertexFlags::empty();
    let mut rgba = [255u8; 4];

    if let Some(c) = color {
        flags |= VertexFlags::USE_COLOR;
        rgba = c.to_rgba8();
        if c.a < 1.0 {
            flags |= VertexFlags::USE_ALPHA;
        }
    }
    if let Some(a) = alpha {
        flags |= VertexFlags::USE_ALPHA;
        let base = color.map_or(1.0, |c| c.a.clamp(0.0, 1.0));
        rgba[3] = unorm8(base * a);
    }

    let perm = affine.corner_permutation();
    std::array::from_fn(|i| {
        let position = UNIT_QUAD[i].mul_elem(affine.scale) + affine.translation;
        SpriteVertex::new(position, uv.corners[perm[i]], rgba, flags)
    })
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;
    use crate::coords::{Reflection, Rotation};

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn stride_is_twenty_bytes() {
        assert_eq!(size_of::<SpriteVertex>(), 20);
        assert_eq!(VERTEX_STRIDE, 20);
        assert_eq!(SpriteVertex::layout().array_stride, 20);
    }

    #[test]
    fn declared_attributes_match_struct_offsets() {
        let attrs = SpriteVertex::ATTRS;
        let expected = [
            (0, offset_of!(SpriteVertex, position), wgpu::VertexFormat::Float32x2),
            (1, offset_of!(SpriteVertex, uv), wgpu::VertexFormat::Unorm16x2),
            (2, offset_of!(SpriteVertex, color), wgpu::VertexFormat::Unorm8x4),
            (3, offset_of!(SpriteVertex, flags), wgpu::VertexFormat::Uint32),
        ];
        for (attr, (location, offset, format)) in attrs.iter().zip(expected) {
            assert_eq!(attr.shader_location, location);
            assert_eq!(attr.offset as usize, offset, "location {location}");
            assert_eq!(attr.format, format, "location {location}");
        }
    }

    #[test]
    fn attributes_tile_the_stride_without_gaps() {
        let end = SpriteVertex::ATTRS
            .iter()
            .map(|a| a.offset + a.format.size())
            .max()
            .unwrap_or(0);
        assert_eq!(end as usize, VERTEX_STRIDE);
    }

    #[test]
    fn shader_inputs_match_declared_locations() {
        let src = include_str!("shaders/sprite.wgsl");
        assert!(src.contains("@location(0) position: vec2<f32>"));
        assert!(src.contains("@location(1) uv: vec2<f32>"));
        assert!(src.contains("@location(2) color: vec4<f32>"));
        assert!(src.contains("@location(3) flags: u32"));
        assert!(src.contains(&format!("USE_COLOR: u32 = {}u", VertexFlags::USE_COLOR.bits())));
        assert!(src.contains(&format!("USE_ALPHA: u32 = {}u", VertexFlags::USE_ALPHA.bits())));
    }

    #[test]
    fn color_bytes_are_in_rgba_memory_order() {
        let v = SpriteVertex::new(Vec2::ZERO, Vec2::ZERO, [1, 2, 3, 4], VertexFlags::empty());
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[12..16], &[1, 2, 3, 4]);
    }

    // ── quantization ──────────────────────────────────────────────────────

    #[test]
    fn uv_quantization_hits_the_endpoints() {
        assert_eq!(quantize_uv(0.0), 0);
        assert_eq!(quantize_uv(1.0), u16::MAX);
        assert_eq!(quantize_uv(-0.25), 0);
        assert_eq!(quantize_uv(1.5), u16::MAX);
    }

    #[test]
    fn uv_quantization_error_is_below_half_a_step() {
        for i in 0..=1000 {
            let u = i as f32 / 1000.0;
            let err = (dequantize_uv(quantize_uv(u)) - u).abs();
            assert!(err <= 0.5 / u16::MAX as f32 + 1e-7, "u = {u}");
        }
    }

    // ── sprite_quad ───────────────────────────────────────────────────────

    #[test]
    fn quad_corners_follow_winding_order() {
        let affine = AffineTransform::new(Vec2::new(100.0, 50.0), Vec2::new(32.0, 16.0));
        let q = sprite_quad(&affine, &UvQuad::FULL, None, None);
        assert_eq!(q[0].position(), Vec2::new(84.0, 42.0));
        assert_eq!(q[1].position(), Vec2::new(84.0, 58.0));
        assert_eq!(q[2].position(), Vec2::new(116.0, 58.0));
        assert_eq!(q[3].position(), Vec2::new(116.0, 42.0));
        assert_eq!(q[0].uv(), Vec2::new(0.0, 0.0));
        assert_eq!(q[2].uv(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn rotation_permutes_uvs_not_positions() {
        let plain = AffineTransform::from_scale(Vec2::new(10.0, 10.0));
        let turned = plain.with_rotation(Rotation::Deg90);
        let a = sprite_quad(&plain, &UvQuad::FULL, None, None);
        let b = sprite_quad(&turned, &UvQuad::FULL, None, None);
        for i in 0..4 {
            assert_eq!(a[i].position, b[i].position);
        }
        // Screen TL now samples material BL.
        assert_eq!(b[0].uv(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn horizontal_mirror_swaps_u() {
        let affine = AffineTransform::from_scale(Vec2::ONE).with_reflection(Reflection::Horizontal);
        let q = sprite_quad(&affine, &UvQuad::FULL, None, None);
        assert_eq!(q[0].uv(), Vec2::new(1.0, 0.0));
        assert_eq!(q[3].uv(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn plain_sprite_sets_no_flags() {
        let q = sprite_quad(&AffineTransform::identity(), &UvQuad::FULL, None, None);
        assert!(q.iter().all(|v| v.flags == 0));
        assert!(q.iter().all(|v| v.color_rgba8() == [255, 255, 255, 255]));
    }

    #[test]
    fn color_override_sets_use_color() {
        let q = sprite_quad(&AffineTransform::identity(), &UvQuad::FULL, Some(Color::rgb(1.0, 0.0, 0.0)), None);
        assert_eq!(q[0].vertex_flags(), VertexFlags::USE_COLOR);
        assert_eq!(q[0].color_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn alpha_override_sets_use_alpha_and_alpha_byte() {
        let q = sprite_quad(&AffineTransform::identity(), &UvQuad::FULL, None, Some(0.5));
        assert_eq!(q[0].vertex_flags(), VertexFlags::USE_ALPHA);
        assert_eq!(q[0].color_rgba8()[3], 128);
    }

    #[test]
    fn alpha_override_multiplies_translucent_color() {
        let c = Color::new(0.0, 1.0, 0.0, 0.5);
        let q = sprite_quad(&AffineTransform::identity(), &UvQuad::FULL, Some(c), Some(0.5));
        assert_eq!(q[0].vertex_flags(), VertexFlags::USE_COLOR | VertexFlags::USE_ALPHA);
        assert_eq!(q[0].color_rgba8(), [0, 255, 0, 64]);
    }
}
