use crate::coords::Viewport;

/// Everything one `SpriteRenderer::render` call writes through: device handles,
/// the frame's encoder, and the window it ends up in.
pub struct FrameTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Window color view; the post pass draws here.
    pub window_view: &'a wgpu::TextureView,
    /// Format of `window_view`, shared by the offscreen target.
    pub format: wgpu::TextureFormat,
    /// Design resolution onto the window.
    pub viewport: Viewport,
}
