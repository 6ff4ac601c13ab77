/// Design-resolution color target of the sprite pass.
///
/// Recreated only when the requested size or format differs from the current one.
#[derive(Default)]
pub struct OffscreenTarget {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    size: (u32, u32),
    format: Option<wgpu::TextureFormat>,
}

impl OffscreenTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the texture was (re)created and views of the old one are stale.
    pub fn ensure(&mut self, device: &wgpu::Device, size: (u32, u32), format: wgpu::TextureFormat) -> bool {
        if self.texture.is_some() && self.size == size && self.format == Some(format) {
            return false;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera offscreen target"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        log::debug!("offscreen target created: {}x{} {format:?}", size.0, size.1);
        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.size = size;
        self.format = Some(format);
        true
    }

    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}
