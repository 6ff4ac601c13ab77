//! Text as sprites.
//!
//! Fonts do not own GPU resources. A font maps characters to material keys and
//! positions; the glyph images live in the asset source like any other sprite.

mod bitmap;
mod proportional;
mod shelf;

pub use bitmap::BitmapFont;
pub use proportional::{FontLoadError, GlyphSheet, ProportionalFont};
pub use shelf::ShelfPacker;

use crate::coords::{AffineTransform, Vec2};
use crate::error::Result;
use crate::paint::Color;
use crate::scene::Painter;

/// Turns a string into glyph sprites.
///
/// `affine.translation` is the top-left of the first line and `affine.scale`
/// multiplies the font's native pixel size.
pub trait GlyphLayout {
    fn put_glyphs(
        &self,
        painter: &mut Painter<'_>,
        text: &str,
        affine: &AffineTransform,
        color: Option<Color>,
        alpha: Option<f32>,
    ) -> Result<()>;

    /// Unscaled extent of `text` in pixels.
    fn measure(&self, text: &str) -> Vec2;
}
