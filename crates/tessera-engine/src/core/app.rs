use crate::assets::MaterialSource;
use crate::error::Result;
use crate::scene::Painter;

use super::ctx::{Setup, UpdateCtx};

/// Control directive returned by game callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Game contract driven once per frame by the runtime.
pub trait Game {
    /// Called once after the GPU is ready, before the first frame.
    /// Register textures here.
    fn setup(&mut self, setup: &mut Setup<'_>) -> Result<()> {
        let _ = setup;
        Ok(())
    }

    /// Materials resolved by the painter during [`draw`](Self::draw).
    fn assets(&self) -> &dyn MaterialSource;

    /// Advances the simulation.
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl;

    /// Records this frame's sprites, back to front.
    fn draw(&self, painter: &mut Painter<'_>) -> Result<()>;
}
