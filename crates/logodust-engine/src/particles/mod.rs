//! Particle state and the GPU advection pass.
//!
//! Particles live in two equally sized storage buffers. Every frame the
//! advection pass reads one and writes the other, then the roles swap.

mod buffers;
mod ping_pong;
mod record;
mod simulation;

pub use buffers::{plan_upload, ParticleBuffers, Upload};
pub use ping_pong::PingPong;
pub use record::{advect, AdvectParams, ParticleRecord};
pub use simulation::{ParticleSimulation, WORKGROUP_SIZE};
