//! GPU side of sprite rendering.
//!
//! Convention:
//! - sprite geometry is in design pixels (top-left origin, +Y down)
//! - the vertex shader maps it through a per-draw MVP uniform
//! - everything testable without a device (vertex packing, indices, plans,
//!   binding cache, post quad) is plain CPU code

mod binding;
mod config;
mod ctx;
mod indices;
mod offscreen;
mod pipeline;
mod plan;
mod post;
mod textures;
mod uniforms;
pub mod vertex;

pub use binding::{BindingCache, BindingStats};
pub use config::RendererConfig;
pub use ctx::FrameTarget;
pub use indices::{QuadIndices, QUAD_PATTERN};
pub use offscreen::OffscreenTarget;
pub use pipeline::SpriteRenderer;
pub use plan::{design_clip_to_scissor, DrawCall, FramePlan, ScissorRect};
pub use post::{PostQuad, PostVertex};
pub use textures::{check_rgba8_len, TextureRegistry, SPRITE_TEXTURE_FORMAT};
pub use uniforms::{align_to, uniform_stride, DrawUniforms};
pub use vertex::{quantize_uv, sprite_quad, SpriteVertex, VertexFlags};
