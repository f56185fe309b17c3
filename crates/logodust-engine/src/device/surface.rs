use wgpu::{CompositeAlphaMode, SurfaceError, TextureFormat};
use winit::dpi::PhysicalSize;

/// What the frame loop should do after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; try again next frame.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Out of memory; stop.
    Fatal,
}

/// An acquired swapchain image and the encoder recording into it.
///
/// Must be submitted promptly; holding it blocks the next acquire.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

const SRGB_PREFERENCE: [TextureFormat; 2] = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Rgba8UnormSrgb];

pub(crate) fn choose_surface_format(formats: &[TextureFormat], prefer_srgb: bool) -> Option<TextureFormat> {
    if prefer_srgb {
        if let Some(f) = SRGB_PREFERENCE.iter().find(|f| formats.contains(f)) {
            return Some(*f);
        }
    }
    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    modes: &[CompositeAlphaMode],
    requested: Option<CompositeAlphaMode>,
) -> CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(CompositeAlphaMode::Auto)
}

/// Extent for the first surface configuration.
///
/// Some platforms report a zero-area window before its first configure; the
/// surface starts at one pixel and the following `Resized` fixes it.
pub(crate) fn configurable_extent(size: PhysicalSize<u32>) -> (u32, u32) {
    (size.width.max(1), size.height.max(1))
}

pub(crate) fn surface_error_action(err: &SurfaceError) -> SurfaceErrorAction {
    match err {
        SurfaceError::Lost | SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
