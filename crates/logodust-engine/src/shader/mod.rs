//! Shader resource compiler.
//!
//! Takes an ordered list of [`ProgramSpec`]s and produces one [`Program`] per spec,
//! in input order. WGSL stages are deduplicated by exact source text, validated
//! through naga, and reflected for named uniform locations and feedback-capture
//! layouts. GPU modules are created only once every stage compiled and every
//! program linked; there is no partially usable library.

mod error;
mod front;
mod library;
mod program;
mod uniform;

pub use error::ShaderError;
pub use front::{compile_front, FrontOutput};
pub use library::ShaderLibrary;
pub use program::{FeedbackCapture, Program, ProgramSpec, StageId, StageSource};
pub use uniform::{UniformBlock, UniformLocation};
