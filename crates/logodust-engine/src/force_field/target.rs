use crate::coords::ColorRgba;
use crate::error::{check_texture_2d, AllocationError};

/// Float format so that 0.5 encodes "no force" exactly.
pub const FORCE_FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Clear value of the force field: zero force on both axes.
pub const NEUTRAL_CLEAR: ColorRgba = ColorRgba::new(0.5, 0.5, 0.5, 1.0);

/// Texture extent for a surface of `surface_size` physical pixels.
///
/// A minimized window reports zero; the target keeps at least one texel.
pub fn target_extent(surface_size: (u32, u32)) -> (u32, u32) {
    (surface_size.0.max(1), surface_size.1.max(1))
}

/// Offscreen force-field texture, always the size of the surface.
///
/// Never resized in place: a resolution change replaces the whole target and
/// bumps `generation` so bind groups that reference the old view get rebuilt.
pub struct ForceFieldTarget {
    /// Owns the allocation behind `view`.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    generation: u64,
}

impl ForceFieldTarget {
    pub fn new(
        device: &wgpu::Device,
        surface_size: (u32, u32),
        generation: u64,
    ) -> Result<Self, AllocationError> {
        let (width, height) = target_extent(surface_size);
        check_texture_2d(&device.limits(), "force field target", width, height)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("logodust force field"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORCE_FIELD_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            _texture: texture,
            view,
            width,
            height,
            generation,
        })
    }

    /// Replaces this target with a fresh one at `surface_size`.
    ///
    /// On failure the old target stays in place.
    pub fn recreate(&mut self, device: &wgpu::Device, surface_size: (u32, u32)) -> Result<(), AllocationError> {
        let next = Self::new(device, surface_size, self.generation + 1)?;
        log::debug!(
            "force field target recreated: {}x{} -> {}x{}",
            self.width,
            self.height,
            next.width,
            next.height
        );
        *self = next;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
