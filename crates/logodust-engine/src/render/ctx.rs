use crate::coords::{ColorRgba, Viewport};

use super::layout;

/// What a field needs from the current frame's surface.
///
/// Built fresh each frame, so sizes always match the configured surface.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Logical pixels; the space of pointer input and the particle canvas.
    pub viewport: Viewport,
    /// Physical pixels; the size offscreen targets are allocated at.
    pub surface_size: (u32, u32),
}

/// The frame's encoder and swapchain view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Records a pass that only clears the swapchain view.
    pub fn clear(&mut self, label: &str, color: ColorRgba) {
        drop(layout::color_pass(self.encoder, label, self.color_view, Some(color)));
    }
}
