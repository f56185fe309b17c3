//! GPU device and window surface.
//!
//! One adapter, device and queue per window, acquired once at startup. The
//! particle field clones the device and queue handles it needs.

mod context;
mod init;
mod surface;

pub use context::Gpu;
pub use init::{GpuInit, LimitsPolicy};
pub use surface::{GpuFrame, SurfaceErrorAction};
