//! Static quad index buffer contents.

use super::vertex::{INDICES_PER_QUAD, VERTICES_PER_QUAD};

/// Two triangles over a TL, BL, BR, TR quad.
pub const QUAD_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 2, 2, 3, 0];

/// Largest vertex count addressable with 16-bit indices.
const U16_VERTEX_LIMIT: usize = u16::MAX as usize + 1;

/// Index data for `capacity` quads, generated once and never rewritten.
///
/// Uses 16-bit indices while every vertex fits, 32-bit beyond that.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadIndices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl QuadIndices {
    pub fn for_capacity(capacity: usize) -> Self {
        let pattern = (0..capacity).flat_map(|quad| {
            let base = (quad * VERTICES_PER_QUAD) as u32;
            QUAD_PATTERN.iter().map(move |&i| base + i)
        });

        if capacity * VERTICES_PER_QUAD <= U16_VERTEX_LIMIT {
            QuadIndices::U16(pattern.map(|i| i as u16).collect())
        } else {
            QuadIndices::U32(pattern.collect())
        }
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            QuadIndices::U16(_) => wgpu::IndexFormat::Uint16,
            QuadIndices::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            QuadIndices::U16(v) => v.len(),
            QuadIndices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            QuadIndices::U16(v) => bytemuck::cast_slice(v),
            QuadIndices::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Index value at `i`, widened.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            QuadIndices::U16(v) => v.get(i).map(|&x| x as u32),
            QuadIndices::U32(v) => v.get(i).copied(),
        }
    }
}
