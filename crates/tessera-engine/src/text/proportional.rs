use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use thiserror::Error;

use crate::assets::{MaterialAtlas, MaterialFrame, TextureId, UvQuad};
use crate::coords::{AffineTransform, Vec2};
use crate::error::{AssetKind, RenderError, Result};
use crate::paint::Color;
use crate::scene::Painter;

use super::{GlyphLayout, ShelfPacker};

const SHEET_WIDTH: u32 = 512;
const GLYPH_PADDING: u32 = 1;

/// Returned when font bytes cannot be parsed.
#[derive(Error, Debug, Clone)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// RGBA8 glyph sheet produced by [`ProportionalFont::bake`].
///
/// RGB is white and alpha is glyph coverage, so `USE_COLOR` tints it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSheet {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Variable-width font laid out with fontdue at a fixed pixel size.
///
/// Glyph images come from [`bake`](Self::bake), which rasterizes a character set
/// into one sheet and registers a material `"{prefix}{char}"` per glyph.
pub struct ProportionalFont {
    font: fontdue::Font,
    px: f32,
    prefix: String,
}

impl ProportionalFont {
    /// Parses a TrueType or OpenType font.
    pub fn from_bytes(bytes: &[u8], px: f32, prefix: impl Into<String>) -> std::result::Result<Self, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        Ok(Self { font, px, prefix: prefix.into() })
    }

    #[inline]
    pub fn px(&self) -> f32 {
        self.px
    }

    pub fn glyph_key(&self, ch: char) -> String {
        format!("{}{}", self.prefix, ch)
    }

    /// Rasterizes `chars` into a new sheet for `texture` and registers one
    /// material per visible glyph in `atlas`.
    ///
    /// The caller uploads the returned sheet under the same texture id.
    pub fn bake(&self, chars: impl IntoIterator<Item = char>, texture: TextureId, atlas: &mut MaterialAtlas) -> GlyphSheet {
        let mut packer = ShelfPacker::new(SHEET_WIDTH, GLYPH_PADDING);
        let mut placed = Vec::new();

        for ch in chars {
            let (metrics, coverage) = self.font.rasterize(ch, self.px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            match packer.place(w, h) {
                Some((x, y)) => placed.push((ch, x, y, w, h, coverage)),
                None => log::warn!("font: glyph {ch:?} ({w}x{h}) is wider than the sheet, skipped"),
            }
        }

        let (width, height) = (packer.width(), packer.used_height());
        let mut rgba = vec![0u8; (width * height * 4) as usize];
        let size = Vec2::new(width as f32, height as f32);

        for (ch, x, y, w, h, coverage) in &placed {
            for row in 0..*h {
                for col in 0..*w {
                    let a = coverage[(row * w + col) as usize];
                    let i = (((y + row) * width + x + col) * 4) as usize;
                    rgba[i..i + 4].copy_from_slice(&[255, 255, 255, a]);
                }
            }
            let uv = UvQuad::from_pixels(*x as f32, *y as f32, *w as f32, *h as f32, size);
            let frame = MaterialFrame::new(texture, uv, Vec2::new(*w as f32, *h as f32));
            atlas.insert_static(self.glyph_key(*ch), frame);
        }

        log::debug!("font: baked {} glyphs into a {width}x{height} sheet", placed.len());
        GlyphSheet { width, height, rgba }
    }

    fn layout(&self, text: &str) -> Layout<()> {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));
        layout
    }
}

impl GlyphLayout for ProportionalFont {
    fn put_glyphs(
        &self,
        painter: &mut Painter<'_>,
        text: &str,
        affine: &AffineTransform,
        color: Option<Color>,
        alpha: Option<f32>,
    ) -> Result<()> {
        let layout = self.layout(text);
        for g in layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let size = Vec2::new(g.width as f32, g.height as f32);
            let center = (Vec2::new(g.x, g.y) + size / 2.0).mul_elem(affine.scale) + affine.translation;
            let sprite = AffineTransform::new(center, size.mul_elem(affine.scale));
            painter
                .put_sprite(&self.glyph_key(g.parent), &sprite, color, alpha)
                .map_err(|e| match e {
                    RenderError::AssetNotFound { .. } => RenderError::AssetNotFound {
                        kind: AssetKind::Glyph,
                        key: g.parent.to_string(),
                    },
                    other => other,
                })?;
        }
        Ok(())
    }

    fn measure(&self, text: &str) -> Vec2 {
        let layout = self.layout(text);
        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, self.px * 1.2);
        }

        // Pen position after each glyph, not the bitmap's right edge.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = self.font.metrics_indexed(g.key.glyph_index, self.px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(self.px, f32::max);
        Vec2::new(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = ProportionalFont::from_bytes(b"not a font", 12.0, "f:").err();
        assert!(err.is_some_and(|e| e.to_string().starts_with("font load error")));
    }
}
