//! The host contract: the runtime calls an [`App`] with a [`FrameCtx`] once
//! per frame and forwards window events to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
