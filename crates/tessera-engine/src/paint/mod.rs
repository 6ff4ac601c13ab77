//! Color model shared by the recorder and the vertex packer.

pub mod color;

pub use color::Color;
