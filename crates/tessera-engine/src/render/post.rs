use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PostVertex {
    /// Normalized device coordinates.
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl PostVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PostVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// The single quad that blits the offscreen target into the window.
///
/// Covers `offset .. offset + adjusted_screen_size`, leaving the letterbox bars
/// to the clear color. Baked once per viewport; `update` is a no-op until the
/// viewport changes.
#[derive(Debug, Clone)]
pub struct PostQuad {
    flip_v: bool,
    viewport: Option<Viewport>,
    vertices: [PostVertex; 4],
}

impl PostQuad {
    /// `flip_v` inverts V for backends whose render-target origin differs from
    /// their texture origin.
    pub fn new(flip_v: bool) -> Self {
        Self {
            flip_v,
            viewport: None,
            vertices: [PostVertex::zeroed(); 4],
        }
    }

    /// Re-bakes for `viewport` if it changed. Returns `true` when the vertices
    /// must be re-uploaded.
    pub fn update(&mut self, viewport: &Viewport) -> bool {
        if self.viewport.as_ref() == Some(viewport) {
            return false;
        }
        self.vertices = Self::bake(viewport, self.flip_v);
        self.viewport = Some(*viewport);
        log::debug!(
            "post quad re-baked: {}x{} at ({}, {})",
            viewport.adjusted_screen_size.x,
            viewport.adjusted_screen_size.y,
            viewport.offset.x,
            viewport.offset.y
        );
        true
    }

    #[inline]
    pub fn vertices(&self) -> &[PostVertex; 4] {
        &self.vertices
    }

    fn bake(viewport: &Viewport, flip_v: bool) -> [PostVertex; 4] {
        let screen = viewport.actual_screen_size;
        let min = viewport.offset;
        let max = viewport.offset + viewport.adjusted_screen_size;

        // Window pixels (+Y down) to NDC (+Y up).
        let ndc = |x: f32, y: f32| [x / screen.x * 2.0 - 1.0, 1.0 - y / screen.y * 2.0];
        let (v_top, v_bottom) = if flip_v { (1.0, 0.0) } else { (0.0, 1.0) };

        [
            PostVertex { position: ndc(min.x, min.y), uv: [0.0, v_top] },
            PostVertex { position: ndc(min.x, max.y), uv: [0.0, v_bottom] },
            PostVertex { position: ndc(max.x, max.y), uv: [1.0, v_bottom] },
            PostVertex { position: ndc(max.x, min.y), uv: [1.0, v_top] },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn matching_aspect_covers_full_ndc() {
        let mut q = PostQuad::new(false);
        q.update(&Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(1280.0, 720.0)));
        let v = q.vertices();
        assert!(close(v[0].position, [-1.0, 1.0]));
        assert!(close(v[2].position, [1.0, -1.0]));
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn pillarbox_leaves_side_bars() {
        let mut q = PostQuad::new(false);
        q.update(&Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(1600.0, 720.0)));
        let v = q.vertices();
        // 160px bars on a 1600px window: 0.2 NDC each side.
        assert!(close(v[0].position, [-0.8, 1.0]));
        assert!(close(v[3].position, [0.8, 1.0]));
    }

    #[test]
    fn rebakes_only_on_viewport_change() {
        let mut q = PostQuad::new(false);
        let a = Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(800.0, 600.0));
        let b = Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(1024.0, 600.0));
        assert!(q.update(&a));
        assert!(!q.update(&a));
        assert!(q.update(&b));
        assert!(!q.update(&b));
    }

    #[test]
    fn flip_swaps_v_only() {
        let vp = Viewport::new(Vec2::new(320.0, 180.0), Vec2::new(640.0, 360.0));
        let mut plain = PostQuad::new(false);
        let mut flipped = PostQuad::new(true);
        plain.update(&vp);
        flipped.update(&vp);
        for (a, b) in plain.vertices().iter().zip(flipped.vertices()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.uv[0], b.uv[0]);
            assert_eq!(a.uv[1], 1.0 - b.uv[1]);
        }
    }
}
