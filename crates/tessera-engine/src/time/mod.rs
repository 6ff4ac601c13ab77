//! Frame timing.
//!
//! The runtime ticks one `FrameClock` per presented frame; `FrameTime::elapsed`
//! drives sprite animation and `dt` the simulation.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, DEFAULT_DT_MAX, DEFAULT_DT_MIN};
