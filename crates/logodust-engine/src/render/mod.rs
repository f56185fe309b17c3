//! GPU rendering plumbing shared by the particle field.
//!
//! Convention:
//! - Pointer input is in logical pixels (top-left origin, +Y down).
//! - Field geometry (cursor mesh, particles) is +Y up; shaders convert to NDC
//!   using the logical viewport uploaded as a uniform.

mod ctx;
pub(crate) mod layout;

pub use ctx::{RenderCtx, RenderTarget};

#[cfg(test)]
pub(crate) mod headless;
