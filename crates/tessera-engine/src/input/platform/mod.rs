//! Platform event translation.

mod winit;

pub use self::winit::{pointer_to_design, translate_window_event, PIXELS_PER_LINE};
