use crate::assets::TextureId;

use super::plan::ScissorRect;

/// Last state bound on the sprite pass, used to skip redundant rebinds.
///
/// Owned by the renderer and invalidated at the start of every pass. Each
/// `bind_*` call records the new state and returns `true` when the caller must
/// actually issue the GPU command.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BindingCache {
    texture: Option<TextureId>,
    uniform_slot: Option<u32>,
    scissor: Option<ScissorRect>,
    stats: BindingStats,
}

/// Rebinds actually issued since the last `invalidate`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct BindingStats {
    pub texture_binds: u32,
    pub uniform_binds: u32,
    pub scissor_sets: u32,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything; the next bind of each kind is always issued.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub fn bind_texture(&mut self, texture: TextureId) -> bool {
        if self.texture == Some(texture) {
            return false;
        }
        self.texture = Some(texture);
        self.stats.texture_binds += 1;
        true
    }

    pub fn bind_uniforms(&mut self, slot: u32) -> bool {
        if self.uniform_slot == Some(slot) {
            return false;
        }
        self.uniform_slot = Some(slot);
        self.stats.uniform_binds += 1;
        true
    }

    pub fn set_scissor(&mut self, scissor: ScissorRect) -> bool {
        if self.scissor == Some(scissor) {
            return false;
        }
        self.scissor = Some(scissor);
        self.stats.scissor_sets += 1;
        true
    }

    #[inline]
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.texture
    }

    #[inline]
    pub fn stats(&self) -> BindingStats {
        self.stats
    }
}
