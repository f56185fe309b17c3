//! logodust engine crate.
//!
//! Platform and GPU runtime (window loop, device, input, frame clock) plus the
//! particle field itself: a logo made of particles that the pointer pushes
//! around, simulated and drawn entirely on the GPU.
//!
//! Hosts implement [`core::App`], build a [`field::LogoField`] on the first
//! frame and call [`field::LogoField::tick`] from [`core::FrameCtx::render`].

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;

pub mod error;
pub mod shader;
pub mod cursor;
pub mod force_field;
pub mod particles;
pub mod compositor;
pub mod logo;
pub mod field;

pub use error::{AllocationError, LogoError, SetupError};
pub use field::{FieldConfig, FieldInput, LogoField, LogoFailure, TickOutcome};
