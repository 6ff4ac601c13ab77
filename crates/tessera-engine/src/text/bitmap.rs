use crate::coords::{AffineTransform, Vec2};
use crate::error::{AssetKind, RenderError, Result};
use crate::paint::Color;
use crate::scene::Painter;

use super::GlyphLayout;

/// Monospaced font cut from a uniform sprite sheet.
///
/// Glyph `i` (counting from `first`) is the material `"{prefix}{i}"`, which is
/// the key layout `MaterialAtlas::insert_grid` produces.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFont {
    prefix: String,
    cell_size: Vec2,
    first: char,
    glyph_count: u32,
    /// Extra pixels between cells (x) and lines (y).
    spacing: Vec2,
}

impl BitmapFont {
    pub fn new(prefix: impl Into<String>, cell_size: Vec2, first: char, glyph_count: u32) -> Self {
        Self {
            prefix: prefix.into(),
            cell_size,
            first,
            glyph_count,
            spacing: Vec2::ZERO,
        }
    }

    pub fn with_spacing(mut self, spacing: Vec2) -> Self {
        self.spacing = spacing;
        self
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Material key for `ch`, or `None` if the sheet has no cell for it.
    ///
    /// Laying out a visible character without a cell fails with a glyph
    /// `AssetNotFound`; whitespace never needs a cell.
    pub fn glyph_key(&self, ch: char) -> Option<String> {
        let index = (ch as u32).checked_sub(self.first as u32)?;
        (index < self.glyph_count).then(|| format!("{}{}", self.prefix, index))
    }

    fn advance(&self) -> Vec2 {
        self.cell_size + self.spacing
    }
}

impl GlyphLayout for BitmapFont {
    fn put_glyphs(
        &self,
        painter: &mut Painter<'_>,
        text: &str,
        affine: &AffineTransform,
        color: Option<Color>,
        alpha: Option<f32>,
    ) -> Result<()> {
        let advance = self.advance();
        let size = self.cell_size.mul_elem(affine.scale);
        let mut pen = Vec2::ZERO;

        for ch in text.chars() {
            if ch == '\n' {
                pen = Vec2::new(0.0, pen.y + advance.y);
                continue;
            }
            if !ch.is_whitespace() {
                let key = self.glyph_key(ch).ok_or_else(|| RenderError::AssetNotFound {
                    kind: AssetKind::Glyph,
                    key: ch.to_string(),
                })?;
                let center = (pen + self.cell_size / 2.0).mul_elem(affine.scale) + affine.translation;
                painter.put_sprite(&key, &AffineTransform::new(center, size), color, alpha)?;
            }
            pen.x += advance.x;
        }
        Ok(())
    }

    fn measure(&self, text: &str) -> Vec2 {
        let advance = self.advance();
        let lines: Vec<usize> = text.split('\n').map(|l| l.chars().count()).collect();
        let columns = lines.iter().copied().max().unwrap_or(0);
        if columns == 0 && lines.len() <= 1 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (columns as f32 * advance.x - self.spacing.x).max(0.0),
            lines.len() as f32 * advance.y - self.spacing.y,
        )
    }
}
