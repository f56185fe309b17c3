//! Logo ingestion: image resolution off the render thread, mask-to-particle
//! extraction, and latest-request-wins ordering.

mod loader;
mod pixels;
mod resolver;

pub use loader::{LogoLoader, LogoOutcome, LogoRequest};
pub use pixels::{extract_particles, PixelBuffer};
pub use resolver::{ImageResolver, ResolveError};
