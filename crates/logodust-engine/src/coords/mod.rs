//! Coordinate and geometry types shared by the field renderers.
//!
//! Spaces in use:
//! - Logical pixels (DPI-aware), origin top-left, +X right, +Y down (pointer input)
//! - Normalized device coordinates, origin center, +Y up (cursor mesh)
//! - Logo pixels, origin at the surface center, +Y up (particles); scaled into
//!   logical pixels by the field's spacing

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
