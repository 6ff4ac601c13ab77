use std::collections::HashMap;

use crate::assets::TextureId;
use crate::error::GpuStateError;

use super::plan::DrawCall;

/// Texture format of every registered sprite texture.
pub const SPRITE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct TextureEntry {
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// GPU textures keyed by the asset cache's ids.
#[derive(Default)]
pub struct TextureRegistry {
    entries: HashMap<TextureId, TextureEntry>,
}

/// Checks that `len` bytes are exactly a `width x height` RGBA8 image.
pub fn check_rgba8_len(texture: TextureId, width: u32, height: u32, len: usize) -> Result<(), GpuStateError> {
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(GpuStateError::TextureDataSize { texture, expected, actual: len });
    }
    Ok(())
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `rgba` (tightly packed RGBA8 rows) and builds its bind group.
    ///
    /// Replaces any texture already registered under `id`.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        id: TextureId,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), GpuStateError> {
        check_rgba8_len(id, width, height, rgba.len())?;
        if width == 0 || height == 0 {
            return Err(GpuStateError::TextureDataSize { texture: id, expected: 4, actual: 0 });
        }

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera sprite texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SPRITE_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera sprite texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!("texture {id:?} registered: {width}x{height}");
        self.entries.insert(
            id,
            TextureEntry {
                _texture: texture,
                bind_group,
                size: (width, height),
            },
        );
        Ok(())
    }

    /// Returns `false` if `id` was not registered.
    pub fn unregister(&mut self, id: TextureId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            log::debug!("texture {id:?} unregistered");
        }
        removed
    }

    pub fn bind_group(&self, id: TextureId) -> Result<&wgpu::BindGroup, GpuStateError> {
        self.entries
            .get(&id)
            .map(|e| &e.bind_group)
            .ok_or(GpuStateError::UnknownTexture(id))
    }

    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.entries.get(&id).map(|e| e.size)
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails on the first call whose texture is not registered.
    pub fn check_calls(&self, calls: &[DrawCall]) -> Result<(), GpuStateError> {
        check_registered(calls, |id| self.contains(id))
    }
}

fn check_registered(calls: &[DrawCall], registered: impl Fn(TextureId) -> bool) -> Result<(), GpuStateError> {
    match calls.iter().find(|c| !registered(c.texture)) {
        Some(call) => Err(GpuStateError::UnknownTexture(call.texture)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::plan::ScissorRect;

    #[test]
    fn rgba8_length_must_match_dimensions() {
        assert!(check_rgba8_len(TextureId(1), 4, 2, 32).is_ok());
        let err = check_rgba8_len(TextureId(1), 4, 2, 31).unwrap_err();
        assert!(matches!(err, GpuStateError::TextureDataSize { expected: 32, actual: 31, .. }));
    }

    #[test]
    fn first_unregistered_texture_is_reported() {
        let call = |t: u32| DrawCall {
            texture: TextureId(t),
            uniform_slot: 0,
            scissor: ScissorRect::new(0, 0, 1, 1),
            indices: 0..6,
        };
        let calls = [call(1), call(2), call(3)];
        let known = |id: TextureId| id.0 != 2 && id.0 != 3;
        assert!(matches!(check_registered(&calls, known), Err(GpuStateError::UnknownTexture(TextureId(2)))));
        assert!(check_registered(&calls, |_| true).is_ok());
    }
}
