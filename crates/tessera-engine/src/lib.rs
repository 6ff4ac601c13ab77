//! Tessera engine crate.
//!
//! A 2D sprite renderer: game code records sprites against a fixed design
//! resolution, the renderer batches them into as few draw calls as possible,
//! renders offscreen, and blits the result letterboxed into the window.

pub mod assets;
pub mod coords;
pub mod error;
pub mod paint;
pub mod text;
pub mod scene;
pub mod render;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;

pub use error::{RenderError, Result};
