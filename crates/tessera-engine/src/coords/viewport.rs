use glam::{Mat4, Vec3};

use super::{Camera, Vec2};

/// Mapping from the fixed design resolution onto the actual window.
///
/// `adjusted_screen_size` is the largest rectangle with the design aspect ratio
/// that fits inside the window; `offset` centers it, leaving letterbox (top/bottom)
/// or pillarbox (left/right) bars. A viewport is rebuilt, never mutated, when the
/// window is resized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub design_resolution: Vec2,
    pub actual_screen_size: Vec2,
    pub adjusted_screen_size: Vec2,
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Viewport {
    pub fn new(design_resolution: Vec2, actual_screen_size: Vec2) -> Self {
        let aspect = design_resolution.x / design_resolution.y;

        let adjusted_screen_size = if actual_screen_size.x / aspect > actual_screen_size.y {
            // Window is wider than the design: pillarbox.
            Vec2::new(actual_screen_size.y * aspect, actual_screen_size.y)
        } else {
            Vec2::new(actual_screen_size.x, actual_screen_size.x / aspect)
        };

        let offset = (actual_screen_size - adjusted_screen_size) / 2.0;
        let scale = adjusted_screen_size.div_elem(design_resolution);

        Self {
            design_resolution,
            actual_screen_size,
            adjusted_screen_size,
            offset,
            scale,
        }
    }

    /// Viewport of a render target that is exactly the design resolution.
    #[inline]
    pub fn offscreen(design_resolution: Vec2) -> Self {
        Self::new(design_resolution, design_resolution)
    }

    /// False for zero, negative or non-finite sizes (e.g. a minimized window).
    pub fn is_valid(&self) -> bool {
        let positive = |v: Vec2| v.is_finite() && v.x > 0.0 && v.y > 0.0;
        positive(self.design_resolution) && positive(self.actual_screen_size) && positive(self.scale)
    }

    /// Maps a window point (e.g. raw cursor position) into design space.
    #[inline]
    pub fn adjust_to_bounds(&self, point: Vec2) -> Vec2 {
        (point - self.offset).div_elem(self.scale)
    }

    /// Maps a design-space point into window pixels (inverse of `adjust_to_bounds`).
    #[inline]
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point.mul_elem(self.scale) + self.offset
    }

    /// Builds `projection * view * model` for design-space geometry.
    ///
    /// - model: scales design pixels to window pixels
    /// - view: looks at `camera.position`, shifted by the letterbox offset
    /// - projection: orthographic over the window, +Y down, depth in [0, 1]
    ///
    /// The result is column-major and can be uploaded as a WGSL `mat4x4<f32>`.
    pub fn model_view_projection(&self, camera: &Camera) -> Mat4 {
        let zoom = 1.0 / camera.effective_zoom();

        let model = Mat4::from_scale(Vec3::new(self.scale.x, self.scale.y, 1.0));

        let eye = Vec3::new(
            camera.position.x - self.offset.x * zoom,
            camera.position.y - self.offset.y * zoom,
            1.0,
        );
        let view = Mat4::look_at_rh(eye, Vec3::new(eye.x, eye.y, 0.0), Vec3::Y);

        let extent = self.actual_screen_size * zoom;
        let projection = Mat4::orthographic_rh(0.0, extent.x, extent.y, 0.0, 0.0, 2.0);

        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn vp(dw: f32, dh: f32, aw: f32, ah: f32) -> Viewport {
        Viewport::new(Vec2::new(dw, dh), Vec2::new(aw, ah))
    }

    /// Projects a design point through the MVP and back to window pixels.
    fn project(v: &Viewport, camera: &Camera, p: Vec2) -> Vec2 {
        let ndc = v.model_view_projection(camera).project_point3(Vec3::new(p.x, p.y, 0.0));
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * v.actual_screen_size.x,
            (1.0 - ndc.y) * 0.5 * v.actual_screen_size.y,
        )
    }

    // ── letterboxing ──────────────────────────────────────────────────────

    #[test]
    fn same_aspect_fills_window() {
        let v = vp(320.0, 180.0, 1280.0, 720.0);
        assert_eq!(v.adjusted_screen_size, Vec2::new(1280.0, 720.0));
        assert_eq!(v.offset, Vec2::ZERO);
        assert_eq!(v.scale, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn wider_window_gets_pillarbox() {
        let v = vp(320.0, 180.0, 1600.0, 720.0);
        assert!(v.adjusted_screen_size.approx_eq(Vec2::new(1280.0, 720.0), EPS));
        assert!(v.offset.approx_eq(Vec2::new(160.0, 0.0), EPS));
    }

    #[test]
    fn taller_window_gets_letterbox() {
        let v = vp(320.0, 180.0, 640.0, 720.0);
        assert!(v.adjusted_screen_size.approx_eq(Vec2::new(640.0, 360.0), EPS));
        assert!(v.offset.approx_eq(Vec2::new(0.0, 180.0), EPS));
    }

    #[test]
    fn aspect_is_preserved_and_fits() {
        let designs = [(320.0, 180.0), (256.0, 224.0), (100.0, 300.0), (1920.0, 1080.0)];
        let windows = [(800.0, 600.0), (1920.0, 1080.0), (333.0, 1000.0), (1.0, 1.0), (2560.0, 1080.0)];
        for (dw, dh) in designs {
            for (aw, ah) in windows {
                let v = vp(dw, dh, aw, ah);
                let a = v.adjusted_screen_size;
                assert!(((a.x / a.y) - (dw / dh)).abs() < 1e-3, "{dw}x{dh} in {aw}x{ah}");
                assert!(a.x <= aw + EPS && a.y <= ah + EPS, "{dw}x{dh} in {aw}x{ah}");
                assert!(v.offset.x >= -EPS && v.offset.y >= -EPS);
            }
        }
    }

    // ── adjust_to_bounds ──────────────────────────────────────────────────

    #[test]
    fn offset_maps_to_design_origin() {
        for (aw, ah) in [(1600.0, 720.0), (640.0, 720.0), (1280.0, 720.0)] {
            let v = vp(320.0, 180.0, aw, ah);
            assert!(v.adjust_to_bounds(v.offset).approx_eq(Vec2::ZERO, EPS));
        }
    }

    #[test]
    fn adjust_to_bounds_inverts_to_screen() {
        let v = vp(320.0, 180.0, 1000.0, 900.0);
        let p = Vec2::new(123.0, 45.0);
        assert!(v.adjust_to_bounds(v.to_screen(p)).approx_eq(p, EPS));
    }

    #[test]
    fn bar_points_fall_outside_design_space() {
        let v = vp(320.0, 180.0, 1600.0, 720.0);
        let p = v.adjust_to_bounds(Vec2::new(10.0, 10.0));
        assert!(p.x < 0.0);
    }

    // ── model_view_projection ─────────────────────────────────────────────

    #[test]
    fn mvp_maps_design_corners_onto_adjusted_rect() {
        let v = vp(320.0, 180.0, 1600.0, 720.0);
        let cam = Camera::default();
        assert!(project(&v, &cam, Vec2::ZERO).approx_eq(v.offset, EPS));
        assert!(project(&v, &cam, v.design_resolution).approx_eq(v.offset + v.adjusted_screen_size, EPS));
    }

    #[test]
    fn offscreen_mvp_is_pixel_exact() {
        let v = Viewport::offscreen(Vec2::new(320.0, 180.0));
        let p = Vec2::new(17.0, 99.0);
        assert!(project(&v, &Camera::default(), p).approx_eq(p, EPS));
    }

    #[test]
    fn camera_position_scrolls_the_scene() {
        let v = Viewport::offscreen(Vec2::new(320.0, 180.0));
        let cam = Camera::new(Vec2::new(10.0, 5.0), 1.0);
        assert!(project(&v, &cam, Vec2::new(10.0, 5.0)).approx_eq(Vec2::ZERO, EPS));
    }

    #[test]
    fn larger_zoom_magnifies() {
        let v = Viewport::offscreen(Vec2::new(320.0, 180.0));
        let cam = Camera::new(Vec2::ZERO, 2.0);
        assert!(project(&v, &cam, Vec2::new(10.0, 20.0)).approx_eq(Vec2::new(20.0, 40.0), EPS));
    }

    #[test]
    fn camera_to_world_inverts_projection() {
        let v = Viewport::offscreen(Vec2::new(320.0, 180.0));
        let cam = Camera::new(Vec2::new(-12.0, 30.0), 2.5);
        let world = Vec2::new(40.0, 48.0);
        let design = project(&v, &cam, world);
        assert!(cam.to_world(design).approx_eq(world, EPS));
    }

    #[test]
    fn depth_lands_inside_clip_range() {
        let v = vp(320.0, 180.0, 800.0, 600.0);
        let ndc = v
            .model_view_projection(&Camera::default())
            .project_point3(Vec3::new(5.0, 5.0, 0.0));
        assert!(ndc.z >= 0.0 && ndc.z <= 1.0);
    }

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn minimized_window_is_invalid() {
        assert!(!vp(320.0, 180.0, 0.0, 0.0).is_valid());
        assert!(vp(320.0, 180.0, 1.0, 1.0).is_valid());
    }
}
