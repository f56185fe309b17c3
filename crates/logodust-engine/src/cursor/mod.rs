//! Cursor force mesh.
//!
//! Turns the pointer position and this frame's pointer movement into a small
//! triangle strip whose vertices carry the push force the particles feel.

mod mesh;

pub use mesh::{generate, CursorMesh, CursorParams, CursorVertex, NEUTRAL_FORCE};
