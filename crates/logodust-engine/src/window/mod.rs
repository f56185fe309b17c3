//! The winit event loop, its single window and the per-frame dispatch to
//! [`crate::core::App`].

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
