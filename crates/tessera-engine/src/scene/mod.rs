//! Per-frame sprite recording.
//!
//! Responsibilities:
//! - compose scoped draw options (scissor, affine, alpha, effect)
//! - pack sprites into one vertex stream as they are submitted
//! - merge consecutive sprites that share a texture and options into one command

mod cmd;
mod options;
mod painter;
mod state;

pub use cmd::DrawCommand;
pub use options::{DrawOptions, Effect};
pub use painter::Painter;
pub use state::{DrawState, OptionsScope};
