use std::ops::{Deref, DerefMut};

use crate::assets::MaterialFrame;
use crate::coords::AffineTransform;
use crate::error::{RenderError, Result};
use crate::paint::Color;
use crate::render::vertex::{sprite_quad, SpriteVertex, VERTICES_PER_QUAD};

use super::cmd::push_quad;
use super::{DrawCommand, DrawOptions};

/// Per-frame sprite recorder.
///
/// Owns one packed vertex buffer sized for `capacity` sprites, the ordered command
/// list, and the stack of composed draw options. Buffers keep their allocation
/// across frames; `reset()` only rewinds them.
///
/// Invariants between `reset()` calls:
/// - the sum of all command counts equals `sprite_count()`
/// - `vertices().len() == 4 * sprite_count()`
/// - the option stack is never empty; its bottom is `DrawOptions::IDENTITY`
#[derive(Debug)]
pub struct DrawState {
    vertices: Vec<SpriteVertex>,
    commands: Vec<DrawCommand>,
    options: Vec<DrawOptions>,
    capacity: usize,
}

impl DrawState {
    pub fn new(sprite_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(sprite_capacity * VERTICES_PER_QUAD),
            commands: Vec::new(),
            options: vec![DrawOptions::IDENTITY],
            capacity: sprite_capacity,
        }
    }

    /// Rewinds the vertex cursor, drops all commands and resets the option stack.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.commands.clear();
        self.options.truncate(1);
        self.options[0] = DrawOptions::IDENTITY;
    }

    /// Pushes `options` composed onto the current ones.
    ///
    /// The returned guard derefs to the state and pops back to the previous
    /// composite when dropped, including on early return or unwind.
    pub fn scope(&mut self, options: DrawOptions) -> OptionsScope<'_> {
        let depth = self.options.len();
        let composed = self.current_options().concatenate(&options);
        self.options.push(composed);
        OptionsScope { state: self, depth }
    }

    /// Writes one sprite from an already resolved material frame.
    ///
    /// `affine` is composed onto the current scope affine before the corners are
    /// computed. Fails with `BufferOverflow` before touching any buffer when the
    /// frame is full.
    pub fn push_sprite(
        &mut self,
        frame: &MaterialFrame,
        affine: &AffineTransform,
        color: Option<Color>,
        alpha: Option<f32>,
    ) -> Result<()> {
        if self.sprite_count() >= self.capacity {
            return Err(RenderError::BufferOverflow { capacity: self.capacity });
        }

        let options = self.current_options();
        let affine = options.resolved_affine().concatenate(affine);
        self.vertices.extend_from_slice(&sprite_quad(&affine, &frame.uv, color, alpha));
        push_quad(&mut self.commands, frame.texture, &options);
        Ok(())
    }

    /// Commands in submission order.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Vertex data exactly as uploaded to the GPU.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Composite of every open scope.
    #[inline]
    pub fn current_options(&self) -> DrawOptions {
        self.options.last().copied().unwrap_or_default()
    }

    /// Number of open scopes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.options.len() - 1
    }
}

/// Guard for one level of the option stack. See [`DrawState::scope`].
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct OptionsScope<'a> {
    state: &'a mut DrawState,
    depth: usize,
}

impl Deref for OptionsScope<'_> {
    type Target = DrawState;

    fn deref(&self) -> &DrawState {
        self.state
    }
}

impl DerefMut for OptionsScope<'_> {
    fn deref_mut(&mut self) -> &mut DrawState {
        self.state
    }
}

impl Drop for OptionsScope<'_> {
    fn drop(&mut self) {
        self.state.options.truncate(self.depth);
    }
}
