use std::collections::HashMap;

use crate::coords::Vec2;

use super::{Material, MaterialFrame, MaterialSource, TextureId, UvQuad};

/// In-memory material table keyed by name.
///
/// Stands in for a full asset cache: the application registers materials up
/// front and the recorder looks them up by key every frame.
#[derive(Debug, Default, Clone)]
pub struct MaterialAtlas {
    materials: HashMap<String, Material>,
}

impl MaterialAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a material.
    pub fn insert(&mut self, key: impl Into<String>, material: Material) {
        self.materials.insert(key.into(), material);
    }

    /// Inserts a single-frame material.
    pub fn insert_static(&mut self, key: impl Into<String>, frame: MaterialFrame) {
        self.insert(key, Material::Static(frame));
    }

    /// Slices a uniform sprite sheet into `columns x rows` cells.
    ///
    /// Cells are keyed `"{prefix}{index}"` in row-major order and returned as
    /// frames in the same order, ready to build an animation.
    pub fn insert_grid(
        &mut self,
        prefix: &str,
        texture: TextureId,
        texture_size: Vec2,
        cell_size: Vec2,
        columns: u32,
        rows: u32,
    ) -> Vec<MaterialFrame> {
        let mut frames = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let uv = UvQuad::from_pixels(
                    col as f32 * cell_size.x,
                    row as f32 * cell_size.y,
                    cell_size.x,
                    cell_size.y,
                    texture_size,
                );
                let frame = MaterialFrame::new(texture, uv, cell_size);
                self.insert_static(format!("{prefix}{}", frames.len()), frame);
                frames.push(frame);
            }
        }
        log::debug!("atlas: sliced {prefix:?} into {} cells", frames.len());
        frames
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl MaterialSource for MaterialAtlas {
    #[inline]
    fn material(&self, key: &str) -> Option<&Material> {
        self.materials.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_cells_are_row_major() {
        let mut atlas = MaterialAtlas::new();
        let frames = atlas.insert_grid("tile", TextureId(3), Vec2::new(64.0, 32.0), Vec2::new(16.0, 16.0), 4, 2);
        assert_eq!(frames.len(), 8);
        assert_eq!(atlas.len(), 8);

        let Some(Material::Static(f5)) = atlas.material("tile5") else { panic!("tile5 missing") };
        // Row 1, column 1.
        assert_eq!(f5.uv, UvQuad::from_rect(0.25, 0.5, 0.5, 1.0));
        assert_eq!(f5.texture, TextureId(3));
        assert_eq!(f5.pixel_size, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn missing_key_is_none() {
        assert!(MaterialAtlas::new().material("nope").is_none());
    }
}
