use wgpu::util::DeviceExt;

use crate::assets::TextureId;
use crate::coords::{Camera, Viewport};
use crate::error::{GpuStateError, Result};
use crate::scene::DrawState;

use super::binding::BindingCache;
use super::config::RendererConfig;
use super::indices::{QuadIndices, QUAD_PATTERN};
use super::offscreen::OffscreenTarget;
use super::plan::FramePlan;
use super::post::{PostQuad, PostVertex};
use super::textures::TextureRegistry;
use super::uniforms::{uniform_stride, DrawUniforms};
use super::vertex::{SpriteVertex, VERTEX_STRIDE, VERTICES_PER_QUAD};
use super::FrameTarget;

const MIN_UNIFORM_SLOTS: usize = 16;

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Two-pass sprite renderer.
///
/// Pass 1 draws the frame's commands into a design-resolution offscreen target,
/// one indexed draw per command against a static index buffer. Pass 2 clears the
/// window to the letterbox color and blits the target through a single quad.
///
/// Buffers sized by `sprite_capacity` are created once. Pipelines and the
/// offscreen target are rebuilt only when the surface format changes.
pub struct SpriteRenderer {
    config: RendererConfig,

    // created with the renderer
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    post_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_format: wgpu::IndexFormat,
    post_vbo: wgpu::Buffer,
    post_ibo: wgpu::Buffer,
    uniform_stride: u64,

    // pipelines (rebuilt when the surface format changes)
    pipeline_format: Option<wgpu::TextureFormat>,
    sprite_pipeline: Option<wgpu::RenderPipeline>,
    post_pipeline: Option<wgpu::RenderPipeline>,

    // per-frame uniforms (grown on demand)
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,

    // post pass
    offscreen: OffscreenTarget,
    post_bind_group: Option<wgpu::BindGroup>,
    post_quad: PostQuad,

    textures: TextureRegistry,
    cache: BindingCache,
    plan: FramePlan,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, config: RendererConfig) -> Self {
        let capacity = config.sprite_capacity.max(1);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera draw uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(DrawUniforms::min_binding_size()),
                },
                count: None,
            }],
        });

        let texture_layout = texture_sampler_layout(device, "tessera sprite texture bgl");
        let post_layout = texture_sampler_layout(device, "tessera post bgl");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: config.filter,
            min_filter: config.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera sprite vbo"),
            size: (capacity * VERTICES_PER_QUAD * VERTEX_STRIDE) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = QuadIndices::for_capacity(capacity);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera sprite ibo"),
            contents: indices.as_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        let post_vbo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera post vbo"),
            size: (4 * std::mem::size_of::<PostVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let post_indices = QUAD_PATTERN.map(|i| i as u16);
        let post_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera post ibo"),
            contents: bytemuck::cast_slice(&post_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "sprite renderer: design {}x{}, {} sprites/frame, {:?} indices",
            config.design_resolution.x,
            config.design_resolution.y,
            capacity,
            indices.format()
        );

        Self {
            uniform_stride: uniform_stride(&device.limits()),
            post_quad: PostQuad::new(config.offscreen_flip_v),
            index_format: indices.format(),
            config,
            uniform_layout,
            texture_layout,
            post_layout,
            sampler,
            vertex_buffer,
            index_buffer,
            post_vbo,
            post_ibo,
            pipeline_format: None,
            sprite_pipeline: None,
            post_pipeline: None,
            uniform_buffer: None,
            uniform_bind_group: None,
            uniform_capacity: 0,
            offscreen: OffscreenTarget::new(),
            post_bind_group: None,
            textures: TextureRegistry::new(),
            cache: BindingCache::new(),
            plan: FramePlan::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Uploads an RGBA8 texture under `id`, replacing any previous one.
    pub fn register_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: TextureId,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<()> {
        self.textures
            .register(device, queue, &self.texture_layout, &self.sampler, id, width, height, rgba)?;
        Ok(())
    }

    pub fn unregister_texture(&mut self, id: TextureId) -> bool {
        self.textures.unregister(id)
    }

    #[inline]
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    /// Re-bakes the post quad for a new window viewport.
    pub fn resize(&mut self, queue: &wgpu::Queue, viewport: &Viewport) {
        if self.post_quad.update(viewport) {
            queue.write_buffer(&self.post_vbo, 0, bytemuck::cast_slice(self.post_quad.vertices()));
        }
    }

    /// Records both passes of `state` into `target`.
    ///
    /// Fails before uploading or encoding anything if a command references an
    /// unregistered texture, the vertex data exceeds the stream buffer, or a
    /// pipeline resource is missing.
    pub fn render(
        &mut self,
        target: &mut FrameTarget<'_>,
        state: &DrawState,
        camera: &Camera,
    ) -> Result<()> {
        let (device, queue) = (target.device, target.queue);
        self.ensure_pipelines(device, target.format);
        if self.offscreen.ensure(device, self.config.design_extent(), target.format) {
            self.post_bind_group = None;
        }
        self.ensure_post_bindings(device);
        self.resize(queue, &target.viewport);

        // ── upload ─────────────────────────────────────────────────────────
        let bytes = state.vertex_bytes();
        let available = self.vertex_buffer.size();
        if bytes.len() as u64 > available {
            return Err(GpuStateError::VertexUpload { expected: available, actual: bytes.len() as u64 }.into());
        }

        let offscreen = Viewport::offscreen(self.config.design_resolution);
        self.plan.rebuild(state.commands(), &offscreen, camera);
        self.textures.check_calls(self.plan.calls())?;

        self.ensure_uniform_capacity(device, self.plan.uniforms().len());

        let sprite_pipeline = require(self.sprite_pipeline.as_ref(), "sprite pipeline")?;
        let post_pipeline = require(self.post_pipeline.as_ref(), "post pipeline")?;
        let uniform_buffer = require(self.uniform_buffer.as_ref(), "uniform buffer")?;
        let uniform_bind_group = require(self.uniform_bind_group.as_ref(), "uniform bind group")?;
        let offscreen_view = require(self.offscreen.view(), "offscreen target")?;
        let post_bind_group = require(self.post_bind_group.as_ref(), "post bind group")?;

        if !bytes.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        if !self.plan.uniforms().is_empty() {
            queue.write_buffer(uniform_buffer, 0, &self.plan.uniform_bytes(self.uniform_stride));
        }

        // ── pass 1: sprites into the offscreen target ──────────────────────
        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: offscreen_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.cache.invalidate();
            if !self.plan.calls().is_empty() {
                rpass.set_pipeline(sprite_pipeline);
                rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                rpass.set_index_buffer(self.index_buffer.slice(..), self.index_format);

                for call in self.plan.calls() {
                    if self.cache.bind_uniforms(call.uniform_slot) {
                        let offset = call.uniform_slot as u64 * self.uniform_stride;
                        rpass.set_bind_group(0, uniform_bind_group, &[offset as u32]);
                    }
                    if self.cache.bind_texture(call.texture) {
                        rpass.set_bind_group(1, self.textures.bind_group(call.texture)?, &[]);
                    }
                    if self.cache.set_scissor(call.scissor) {
                        let s = call.scissor;
                        rpass.set_scissor_rect(s.x, s.y, s.width, s.height);
                    }
                    rpass.draw_indexed(call.indices.clone(), 0, 0..1);
                }
            }
        }

        log::trace!(
            "sprite pass: {} sprites, {} calls ({} skipped), {:?}",
            state.sprite_count(),
            self.plan.calls().len(),
            self.plan.skipped(),
            self.cache.stats()
        );

        // ── pass 2: letterboxed blit into the window ───────────────────────
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera post pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.window_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.letterbox_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(post_pipeline);
        rpass.set_bind_group(0, post_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.post_vbo.slice(..));
        rpass.set_index_buffer(self.post_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_PATTERN.len() as u32, 0, 0..1);

        Ok(())
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.sprite_pipeline.is_some() {
            return;
        }

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });
        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera sprite pipeline layout"),
            bind_group_layouts: &[&self.uniform_layout, &self.texture_layout],
            immediate_size: 0,
        });

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera post shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/post.wgsl").into()),
        });
        let post_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera post pipeline layout"),
            bind_group_layouts: &[&self.post_layout],
            immediate_size: 0,
        });

        self.sprite_pipeline = Some(create_pipeline(
            device,
            "tessera sprite pipeline",
            &sprite_shader,
            &sprite_layout,
            SpriteVertex::layout(),
            format,
            Some(premul_alpha_blend()),
        ));
        self.post_pipeline = Some(create_pipeline(
            device,
            "tessera post pipeline",
            &post_shader,
            &post_layout,
            PostVertex::layout(),
            format,
            None,
        ));
        self.pipeline_format = Some(format);

        log::info!("sprite renderer: pipelines built for {:?}", format);
    }

    fn ensure_post_bindings(&mut self, device: &wgpu::Device) {
        if self.post_bind_group.is_some() {
            return;
        }
        let Some(view) = self.offscreen.view() else { return };

        self.post_bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera post bind group"),
            layout: &self.post_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
    }

    fn ensure_uniform_capacity(&mut self, device: &wgpu::Device, required_slots: usize) {
        if required_slots <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }

        let new_cap = required_slots.next_power_of_two().max(MIN_UNIFORM_SLOTS);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera draw uniforms"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.uniform_bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera draw uniforms bind group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(DrawUniforms::min_binding_size()),
                }),
            }],
        }));

        log::debug!("uniform buffer grown to {new_cap} slots");
        self.uniform_buffer = Some(buffer);
        self.uniform_capacity = new_cap;
    }
}

/// Borrows a lazily created resource, or names it in the error.
fn require<'a, T>(resource: Option<&'a T>, name: &'static str) -> std::result::Result<&'a T, GpuStateError> {
    resource.ok_or(GpuStateError::MissingResource(name))
}

fn texture_sampler_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    #[test]
    fn missing_resource_is_named() {
        let err = require::<u32>(None, "post bind group").unwrap_err();
        assert!(matches!(err, GpuStateError::MissingResource("post bind group")));
        let err: RenderError = err.into();
        assert_eq!(err.to_string(), "renderer resource missing: post bind group");
    }

    #[test]
    fn present_resource_is_borrowed() {
        let value = 7u32;
        assert_eq!(require(Some(&value), "uniform buffer").ok(), Some(&7));
    }

    #[test]
    fn premultiplied_blend_keeps_destination_under_transparent_source() {
        let blend = premul_alpha_blend();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.alpha, blend.color);
    }
}
