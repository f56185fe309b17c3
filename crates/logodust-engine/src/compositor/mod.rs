//! Draws the particle buffer to the visible surface.

mod renderer;

pub use renderer::{CompositeParams, ParticleCompositor};
