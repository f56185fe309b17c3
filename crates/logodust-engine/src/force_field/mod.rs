//! Offscreen force field.
//!
//! Each frame the cursor mesh is drawn into a screen-sized float texture; the
//! advection pass samples it to push particles around.

mod mask;
mod renderer;
mod target;

pub use mask::{radial_mask_pixels, RADIAL_MASK_SIZE};
pub use renderer::ForceFieldRenderer;
pub use target::{target_extent, ForceFieldTarget, FORCE_FIELD_FORMAT, NEUTRAL_CLEAR};
