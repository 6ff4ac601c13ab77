//! Coordinate and geometry types shared by the recorder and the renderer.
//!
//! Canonical CPU space:
//! - Design pixels (the fixed logical resolution game code draws against)
//! - Origin top-left
//! - +X right, +Y down
//!
//! `Viewport` maps design space onto the actual window, letterboxed.

mod affine;
mod camera;
mod rect;
mod vec2;
mod viewport;

pub use affine::{AffineTransform, Reflection, Rotation};
pub use camera::Camera;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
