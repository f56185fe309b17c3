use thiserror::Error;

use super::pixels::PixelBuffer;

/// Why a logo could not be turned into pixels.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch `{url}`: {reason}")]
    Http { url: String, reason: String },

    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The source decoded to an image with no pixels at all.
    #[error("image has zero width or height")]
    Empty,
}

/// Turns a logo reference into pixels.
///
/// Called on a worker thread; implementations may block. The result must fit
/// within `max_dimension` on both axes, aspect ratio preserved.
pub trait ImageResolver: Send + Sync + 'static {
    fn resolve(&self, url: &str, max_dimension: u32) -> Result<PixelBuffer, ResolveError>;
}
