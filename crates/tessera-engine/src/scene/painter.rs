use crate::assets::MaterialSource;
use crate::coords::AffineTransform;
use crate::error::{RenderError, Result};
use crate::paint::Color;
use crate::text::GlyphLayout;

use super::{DrawOptions, DrawState};

/// Frame-bound recording API handed to game code.
///
/// Resolves material keys through the asset source and writes into the frame's
/// [`DrawState`]. Animated materials are sampled at `elapsed` seconds.
pub struct Painter<'a> {
    state: &'a mut DrawState,
    assets: &'a dyn MaterialSource,
    elapsed: f32,
}

impl<'a> Painter<'a> {
    pub fn new(state: &'a mut DrawState, assets: &'a dyn MaterialSource, elapsed: f32) -> Self {
        Self { state, assets, elapsed }
    }

    /// Draws the material `key` as a quad centered at `affine.translation`,
    /// `affine.scale` pixels wide and high, both composed onto the enclosing
    /// scopes' affine.
    ///
    /// A missing key fails with `AssetNotFound`; nothing is written in that case.
    pub fn put_sprite(
        &mut self,
        key: &str,
        affine: &AffineTransform,
        color: Option<Color>,
        alpha: Option<f32>,
    ) -> Result<()> {
        let frame = self
            .assets
            .material(key)
            .and_then(|m| m.frame_at(self.elapsed))
            .ok_or_else(|| RenderError::material_not_found(key))?;
        self.state.push_sprite(frame, affine, color, alpha)
    }

    /// Lays `text` out with `font`, one sprite per visible glyph.
    pub fn put_text(
        &mut self,
        text: &str,
        affine: &AffineTransform,
        font: &dyn GlyphLayout,
        alpha: Option<f32>,
    ) -> Result<()> {
        font.put_glyphs(self, text, affine, None, alpha)
    }

    /// Like [`put_text`](Self::put_text) with every glyph tinted `color`.
    pub fn put_text_tinted(
        &mut self,
        text: &str,
        affine: &AffineTransform,
        font: &dyn GlyphLayout,
        color: Color,
        alpha: Option<f32>,
    ) -> Result<()> {
        font.put_glyphs(self, text, affine, Some(color), alpha)
    }

    /// Runs `block` with `options` composed onto the current draw options.
    ///
    /// The previous options are restored when `block` returns, whatever it returns.
    pub fn with_options<R>(&mut self, options: DrawOptions, block: impl FnOnce(&mut Painter<'_>) -> R) -> R {
        let mut scope = self.state.scope(options);
        let mut inner = Painter {
            state: &mut scope,
            assets: self.assets,
            elapsed: self.elapsed,
        };
        block(&mut inner)
    }

    #[inline]
    pub fn current_options(&self) -> DrawOptions {
        self.state.current_options()
    }

    /// Seconds since the runtime started, used to pick animation frames.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn sprite_count(&self) -> usize {
        self.state.sprite_count()
    }
}
