use crate::assets::TextureId;
use crate::coords::{Camera, Vec2, Viewport};
use crate::error::Result;
use crate::input::{InputFrame, InputState};
use crate::render::{RendererConfig, SpriteRenderer};
use crate::time::FrameTime;

/// Per-frame context passed to [`Game::update`](super::Game::update).
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    pub input: &'a InputState,
    /// Edges and raw events since the previous frame.
    pub input_frame: &'a InputFrame,
    /// Applied to the next draw.
    pub camera: &'a mut Camera,
    /// Current window viewport.
    pub viewport: &'a Viewport,
}

impl UpdateCtx<'_> {
    /// Pointer position in world space, if the cursor is inside the window.
    pub fn pointer_world(&self) -> Option<Vec2> {
        self.input.pointer.map(|p| self.camera.to_world(p))
    }
}

/// GPU access handed to [`Game::setup`](super::Game::setup).
pub struct Setup<'a> {
    pub(crate) renderer: &'a mut SpriteRenderer,
    pub(crate) device: &'a wgpu::Device,
    pub(crate) queue: &'a wgpu::Queue,
}

impl<'a> Setup<'a> {
    pub fn new(renderer: &'a mut SpriteRenderer, device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { renderer, device, queue }
    }

    /// Uploads tightly packed RGBA8 pixels under `id`.
    pub fn register_texture(&mut self, id: TextureId, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        self.renderer.register_texture(self.device, self.queue, id, width, height, rgba)
    }

    pub fn unregister_texture(&mut self, id: TextureId) -> bool {
        self.renderer.unregister_texture(id)
    }

    pub fn config(&self) -> &RendererConfig {
        self.renderer.config()
    }
}
