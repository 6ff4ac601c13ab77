//! Input subsystem.
//!
//! The public types do not expose winit; `platform` translates window events
//! and maps pointer positions into design space.

mod frame;
pub mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};
