//! Logo references to pixels: local paths, `file://` and `http(s)://` URLs.

use std::path::PathBuf;
use std::time::Duration;

use logodust_engine::logo::{ImageResolver, PixelBuffer, ResolveError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_DOWNLOAD_BYTES: u64 = 32 * 1024 * 1024;

/// Where a logo reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    File(PathBuf),
    Http(String),
}

impl LogoSource {
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if let Some(path) = trimmed.strip_prefix("file://") {
            return LogoSource::File(PathBuf::from(path));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return LogoSource::Http(trimmed.to_string());
        }
        LogoSource::File(PathBuf::from(trimmed))
    }
}

/// Largest size with the same aspect ratio that fits `max` on both axes.
///
/// Images that already fit are left alone.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max);
    (w, h)
}

/// Decodes any supported image format into RGBA8, scaled to fit `max_dimension`.
pub fn decode(bytes: &[u8], max_dimension: u32) -> Result<PixelBuffer, ResolveError> {
    let img = image::load_from_memory(bytes).map_err(|e| ResolveError::Decode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(ResolveError::Empty);
    }

    let (w, h) = fit_within(img.width(), img.height(), max_dimension);
    let img = if (w, h) != (img.width(), img.height()) {
        img.resize_exact(w, h, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    PixelBuffer::new(rgba.width(), rgba.height(), rgba.into_raw())
}

/// Resolver used by the viewer.
pub struct LogoResolver {
    agent: ureq::Agent,
}

impl LogoResolver {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build();
        Self { agent: config.into() }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResolveError> {
        let http = |reason: String| ResolveError::Http {
            url: url.to_string(),
            reason,
        };

        let mut response = self.agent.get(url).call().map_err(|e| http(e.to_string()))?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_DOWNLOAD_BYTES)
            .read_to_vec()
            .map_err(|e| http(e.to_string()))
    }
}

impl Default for LogoResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver for LogoResolver {
    fn resolve(&self, url: &str, max_dimension: u32) -> Result<PixelBuffer, ResolveError> {
        let bytes = match LogoSource::parse(url) {
            LogoSource::File(path) => std::fs::read(&path).map_err(|source| ResolveError::Io {
                path: path.display().to_string(),
                source,
            })?,
            LogoSource::Http(url) => self.fetch(&url)?,
        };

        log::debug!("resolved `{url}`: {} bytes", bytes.len());
        decode(&bytes, max_dimension)
    }
}
