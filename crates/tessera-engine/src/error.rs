//! Error types for recording and rendering.
//!
//! Every variant is a programming or configuration error, never a transient
//! condition: callers are expected to report and stop, not retry.

use std::fmt;

use thiserror::Error;

use crate::assets::TextureId;

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Which asset table a failed lookup went to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AssetKind {
    Material,
    /// A character a font was never baked with.
    Glyph,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Material => "material",
            AssetKind::Glyph => "glyph",
        })
    }
}

/// Fatal renderer errors.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A referenced asset key is not present in the asset source.
    #[error("{kind} not found: {key:?}")]
    AssetNotFound { kind: AssetKind, key: String },

    /// More sprites were submitted in one frame than the recorder was sized for.
    #[error("sprite buffer overflow: capacity is {capacity} sprites per frame")]
    BufferOverflow { capacity: usize },

    /// GPU-side state does not match what the frame requires.
    #[error(transparent)]
    GpuState(#[from] GpuStateError),
}

impl RenderError {
    #[inline]
    pub fn material_not_found(key: &str) -> Self {
        RenderError::AssetNotFound { kind: AssetKind::Material, key: key.to_owned() }
    }
}

/// Mismatches between recorded frame data and GPU resources.
#[derive(Error, Debug)]
pub enum GpuStateError {
    /// A draw command references a texture that was never registered with the renderer.
    #[error("draw command references unregistered texture {0:?}")]
    UnknownTexture(TextureId),

    /// Texture upload data does not match the declared dimensions.
    #[error("texture {texture:?}: expected {expected} bytes of RGBA8 data, got {actual}")]
    TextureDataSize {
        texture: TextureId,
        expected: usize,
        actual: usize,
    },

    /// The vertex data handed to the GPU does not fit the stream buffer.
    #[error("vertex upload of {actual} bytes exceeds the {expected}-byte stream buffer")]
    VertexUpload { expected: u64, actual: u64 },

    /// A renderer resource the frame needs was never created.
    #[error("renderer resource missing: {0}")]
    MissingResource(&'static str),

    /// The presentation surface is unusable.
    #[error("surface error: {0}")]
    Surface(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_key() {
        let e = RenderError::material_not_found("Tile");
        assert_eq!(e.to_string(), "material not found: \"Tile\"");

        let e = RenderError::BufferOverflow { capacity: 4 };
        assert!(e.to_string().contains("capacity is 4"));

        let e: RenderError = GpuStateError::UnknownTexture(TextureId(7)).into();
        assert!(e.to_string().contains("TextureId(7)"));
    }
}
