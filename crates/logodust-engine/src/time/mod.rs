//! Frame timing.
//!
//! The runtime ticks one [`FrameClock`] per window; the resulting
//! [`FrameTime`] supplies the simulation's elapsed time and clamped step.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
