//! Contract between the runtime loop and game code.
//!
//! The runtime owns the window, the GPU and the per-frame buffers; games see
//! only [`UpdateCtx`], [`Setup`] and a [`Painter`](crate::scene::Painter).

mod app;
mod ctx;
mod driver;

pub use app::{AppControl, Game};
pub use ctx::{Setup, UpdateCtx};
pub use driver::{FrameDriver, FrameSink};
