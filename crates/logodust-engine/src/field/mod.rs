//! The interactive logo particle field.
//!
//! [`LogoField`] owns every GPU resource of the effect and advances it once
//! per host frame:
//!
//! 1. cursor mesh -> force-field target,
//! 2. advection pass (read buffer -> write buffer, then swap),
//! 3. the freshly written buffer is composited to the surface.
//!
//! Logos are resolved off-thread; only the most recent request is ever applied.

mod config;
mod programs;
mod resize;

use std::sync::Arc;
use std::time::Instant;

pub use config::FieldConfig;
pub use resize::{ResizeDebouncer, ResizePhase};

use crate::compositor::{CompositeParams, ParticleCompositor};
use crate::coords::{ColorRgba, Vec2};
use crate::device::Gpu;
use crate::error::{LogoError, SetupError};
use crate::force_field::{ForceFieldRenderer, ForceFieldTarget};
use crate::logo::{ImageResolver, LogoLoader, LogoOutcome, LogoRequest};
use crate::particles::{AdvectParams, ParticleBuffers, ParticleSimulation};
use crate::render::{RenderCtx, RenderTarget};
use crate::shader::ShaderLibrary;

use programs::Role;

/// Host input for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldInput {
    /// Seconds since start.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Pointer position in logical pixels; `None` when outside the surface.
    pub pointer: Option<Vec2>,
    /// Pointer movement this frame, logical pixels.
    pub movement: Vec2,
}

/// What a tick did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// Resize in progress; the surface was cleared transparent.
    Suspended,
    /// No logo yet; the surface was cleared.
    NoParticles,
    /// Force field, advection and compositing all ran.
    Composited,
}

/// A current logo request that did not make it onto the screen.
#[derive(Debug)]
pub struct LogoFailure {
    pub request: LogoRequest,
    pub error: LogoError,
}

type FailureHook = Box<dyn FnMut(&LogoFailure)>;

pub struct LogoField {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: FieldConfig,

    library: ShaderLibrary,
    force_target: ForceFieldTarget,
    force_renderer: ForceFieldRenderer,
    simulation: ParticleSimulation,
    compositor: ParticleCompositor,

    particles: Option<ParticleBuffers>,
    loader: LogoLoader,
    resize: ResizeDebouncer,
    ticks: u64,

    on_logo_failed: Option<FailureHook>,
}

impl LogoField {
    /// Builds every pipeline and size-dependent resource for `gpu`'s surface.
    ///
    /// Fails if the adapter cannot run compute passes, a shader does not
    /// compile or link, or the force field does not fit the device.
    pub fn new(
        gpu: &Gpu<'_>,
        config: FieldConfig,
        resolver: Arc<dyn ImageResolver>,
    ) -> Result<Self, SetupError> {
        let config = config.sanitized();

        if !gpu.downlevel_flags().contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
            return Err(SetupError::MissingCapability("compute shaders"));
        }

        let device = gpu.device().clone();
        let queue = gpu.queue().clone();

        let library = ShaderLibrary::compile(&device, &programs::specs())?;
        let program = |role: Role| library.program(role.index());

        let size = gpu.size();
        let force_target = ForceFieldTarget::new(&device, (size.width, size.height), 0)?;

        let force_renderer = ForceFieldRenderer::new(
            &device,
            &queue,
            &library,
            program(Role::CursorDraw),
            program(Role::CursorDebug),
            gpu.surface_format(),
            config.cursor,
        )?;
        let simulation = ParticleSimulation::new(&device, &library, program(Role::ParticleAdvect))?;
        let compositor = ParticleCompositor::new(&device, &library, program(Role::ParticleDraw), gpu.surface_format())?;

        log::info!(
            "particle field ready on {} ({}x{} force field)",
            gpu.adapter_summary(),
            force_target.width(),
            force_target.height()
        );

        Ok(Self {
            loader: LogoLoader::new(resolver, config.logo_max_dimension),
            resize: ResizeDebouncer::new(config.resize_quiet),
            device,
            queue,
            config,
            library,
            force_target,
            force_renderer,
            simulation,
            compositor,
            particles: None,
            ticks: 0,
            on_logo_failed: None,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn force_target(&self) -> &ForceFieldTarget {
        &self.force_target
    }

    /// Number of live particles (0 before the first logo lands).
    pub fn particle_count(&self) -> u32 {
        self.particles.as_ref().map_or(0, ParticleBuffers::count)
    }

    /// Frames composited since setup.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Index of the current read buffer, if particles exist.
    pub fn read_index(&self) -> Option<usize> {
        self.particles.as_ref().map(ParticleBuffers::read_index)
    }

    /// Sets the callback invoked when the latest logo request fails.
    ///
    /// Hosts use it to forget a persisted logo selection. The current
    /// particles are left as they were.
    pub fn set_logo_failed_hook(&mut self, hook: impl FnMut(&LogoFailure) + 'static) {
        self.on_logo_failed = Some(Box::new(hook));
    }

    /// Starts loading `url` as the new logo. Fire-and-forget.
    pub fn request_logo(&mut self, url: impl Into<String>) -> LogoRequest {
        let request = self.loader.request(url);
        log::info!("requesting logo #{} `{}`", request.id, request.url);
        request
    }

    /// Signals that the surface changed size.
    ///
    /// Rendering pauses until resizes stop for the configured quiet period.
    pub fn on_resize(&mut self) {
        self.resize.notify(Instant::now());
    }

    /// Advances the field by one frame and records it into `target`.
    pub fn tick(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, input: FieldInput) -> TickOutcome {
        self.apply_logo_results();

        match self.resize.poll(Instant::now()) {
            ResizePhase::Suspended => {
                log::trace!("tick skipped: resize in progress");
                target.clear("logodust suspended clear", ColorRgba::transparent());
                return TickOutcome::Suspended;
            }
            ResizePhase::Settled => {
                settle_resize(&self.device, &mut self.force_target, self.particles.as_mut(), ctx.surface_size)
            }
            ResizePhase::Idle => {}
        }

        let composite = CompositeParams {
            clear: self.config.clear_color,
            tint: self.config.particle_color,
            spacing: self.config.spacing,
            sprite_size: self.config.sprite_size,
        };

        let Some(particles) = self.particles.as_mut() else {
            log::trace!("tick without particles");
            self.compositor.composite(&self.queue, target, None, ctx.viewport, &composite);
            return TickOutcome::NoParticles;
        };

        self.force_renderer.render(
            &self.queue,
            target.encoder,
            &self.force_target,
            input.pointer,
            input.movement,
            ctx.viewport,
        );

        let advect = AdvectParams {
            delta_time: input.delta_time,
            time: input.time,
            canvas_size: ctx.viewport.canvas_size(),
            spacing: self.config.spacing,
            force_strength: self.config.force_strength,
            stiffness: self.config.stiffness,
            damping: self.config.damping,
            shimmer: self.config.shimmer,
        };
        self.simulation
            .step(&self.device, &self.queue, target.encoder, particles, &self.force_target, &advect);

        self.compositor
            .composite(&self.queue, target, Some(particles), ctx.viewport, &composite);

        if self.config.debug_cursor {
            self.force_renderer.draw_debug(target);
        }

        self.ticks += 1;
        TickOutcome::Composited
    }

    fn apply_logo_results(&mut self) {
        for outcome in self.loader.poll() {
            let failure = match outcome {
                LogoOutcome::Ready { request, particles } => {
                    match ParticleBuffers::upload(&mut self.particles, &self.device, &self.queue, &particles) {
                        Ok(plan) => {
                            log::info!(
                                "logo #{} `{}` applied: {} particles ({plan:?})",
                                request.id,
                                request.url,
                                particles.len()
                            );
                            continue;
                        }
                        Err(e) => LogoFailure {
                            request,
                            error: e.into(),
                        },
                    }
                }
                LogoOutcome::Failed { request, error } => LogoFailure {
                    request,
                    error: error.into(),
                },
            };

            log::warn!(
                "logo #{} `{}` failed: {}",
                failure.request.id,
                failure.request.url,
                failure.error
            );
            if let Some(hook) = self.on_logo_failed.as_mut() {
                hook(&failure);
            }
        }
    }
}

/// Brings size-dependent state in line with the surface once resizing stops.
///
/// The force field is rebuilt at `surface_size` (kept as is if that fails)
/// and the particles read from their first buffer again.
fn settle_resize(
    device: &wgpu::Device,
    target: &mut ForceFieldTarget,
    particles: Option<&mut ParticleBuffers>,
    surface_size: (u32, u32),
) {
    match target.recreate(device, surface_size) {
        Ok(()) => log::debug!("resize settled at {}x{}", surface_size.0, surface_size.1),
        Err(e) => log::error!("keeping the old force field after resize: {e}"),
    }
    if let Some(particles) = particles {
        particles.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleRecord;
    use crate::render::headless;

    #[test]
    fn settled_resize_matches_surface_and_resets_read_slot() {
        let Some((device, queue)) = headless::device() else { return };

        let mut target = ForceFieldTarget::new(&device, (320, 200), 0).unwrap();
        let mut particles = None;
        ParticleBuffers::upload(&mut particles, &device, &queue, &[ParticleRecord::at_rest([0.0, 0.0], 1.0)]).unwrap();
        let buffers = particles.as_mut().unwrap();
        buffers.swap();
        assert_eq!(buffers.read_index(), 1);

        settle_resize(&device, &mut target, Some(&mut *buffers), (800, 600));

        assert_eq!(target.size(), (800, 600));
        assert_eq!(target.generation(), 1);
        assert_eq!(buffers.read_index(), 0);
    }

    #[test]
    fn settled_resize_without_particles_still_rebuilds_target() {
        let Some((device, _queue)) = headless::device() else { return };

        let mut target = ForceFieldTarget::new(&device, (320, 200), 3).unwrap();
        settle_resize(&device, &mut target, None, (0, 480));

        assert_eq!(target.size(), (1, 480));
        assert_eq!(target.generation(), 4);
    }
}
