//! Asset-side types the renderer reads but never loads.
//!
//! Loading, decoding and eviction belong to the application's asset cache. The
//! renderer only needs materials (texture id + UV quad + pixel size) looked up by
//! key through [`MaterialSource`], and textures registered by id with the
//! [`SpriteRenderer`](crate::render::SpriteRenderer).

mod atlas;
mod material;

pub use atlas::MaterialAtlas;
pub use material::{Material, MaterialFrame, MaterialSource, TextureId, UvQuad};
