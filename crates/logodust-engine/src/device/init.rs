/// Which device limits to request.
///
/// Particle buffers grow with the logo, so the default asks for whatever the
/// adapter supports rather than the portable minimum.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LimitsPolicy {
    /// `wgpu::Limits::default()`.
    Portable,
    /// `wgpu::Limits::downlevel_defaults()`, for older GL-class adapters.
    Downlevel,
    /// Everything the adapter reports.
    Adapter,
}

impl LimitsPolicy {
    pub(crate) fn resolve(self, adapter: &wgpu::Limits) -> wgpu::Limits {
        match self {
            Self::Portable => wgpu::Limits::default(),
            Self::Downlevel => wgpu::Limits::downlevel_defaults(),
            Self::Adapter => adapter.clone(),
        }
    }
}

/// How to open the device and configure the surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB swapchain so sprite falloff blends evenly.
    pub prefer_srgb: bool,
    /// FIFO paces the simulation to the display.
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub limits: LimitsPolicy,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            limits: LimitsPolicy::Adapter,
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_policy_passes_adapter_limits_through() {
        let adapter = wgpu::Limits {
            max_storage_buffer_binding_size: 1 << 30,
            ..wgpu::Limits::default()
        };
        let resolved = LimitsPolicy::Adapter.resolve(&adapter);
        assert_eq!(resolved.max_storage_buffer_binding_size, 1 << 30);
    }

    #[test]
    fn portable_policy_ignores_adapter() {
        let adapter = wgpu::Limits {
            max_texture_dimension_2d: 32768,
            ..wgpu::Limits::default()
        };
        let resolved = LimitsPolicy::Portable.resolve(&adapter);
        assert_eq!(resolved.max_texture_dimension_2d, wgpu::Limits::default().max_texture_dimension_2d);
    }
}
