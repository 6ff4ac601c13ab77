use crate::coords::{Camera, Viewport};
use crate::error::Result;
use crate::input::{InputFrame, InputState};
use crate::scene::{DrawState, Painter};
use crate::time::FrameTime;

use super::{AppControl, Game, UpdateCtx};

/// Consumer of a recorded frame, normally the GPU renderer.
pub trait FrameSink {
    fn submit(&mut self, state: &DrawState, camera: &Camera) -> Result<()>;
}

/// Runs one frame: `update`, then `reset` + `draw`, then `submit`.
///
/// Owns the draw buffers and the camera so they outlive any single frame.
pub struct FrameDriver {
    state: DrawState,
    camera: Camera,
}

impl FrameDriver {
    pub fn new(sprite_capacity: usize) -> Self {
        Self {
            state: DrawState::new(sprite_capacity),
            camera: Camera::default(),
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Drives `game` through one frame into `sink`.
    ///
    /// An `Exit` from `update` skips drawing. Errors from `draw` or `submit`
    /// end the frame immediately.
    #[allow(clippy::too_many_arguments)]
    pub fn frame<G: Game + ?Sized>(
        &mut self,
        game: &mut G,
        time: FrameTime,
        input: &InputState,
        input_frame: &InputFrame,
        viewport: &Viewport,
        sink: &mut dyn FrameSink,
    ) -> Result<AppControl> {
        let control = {
            let mut ctx = UpdateCtx {
                time,
                input,
                input_frame,
                camera: &mut self.camera,
                viewport,
            };
            game.update(&mut ctx)
        };
        if control == AppControl::Exit {
            return Ok(control);
        }

        self.state.reset();
        {
            let mut painter = Painter::new(&mut self.state, game.assets(), time.elapsed);
            game.draw(&mut painter)?;
        }

        sink.submit(&self.state, &self.camera)?;
        Ok(control)
    }
}
