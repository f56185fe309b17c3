use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// The window the field draws into.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Keeps the surface, and so the force field target, from collapsing.
    pub min_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "logodust".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            min_size: LogicalSize::new(64.0, 64.0),
        }
    }
}

/// Requests an app can make of the runtime during a frame.
///
/// Applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point: opens the window, then drives `app` until it exits or the
/// window closes. [`CoreApp::on_exit`] runs once afterwards.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            gpu_init,
            app,
            surface: None,
            occluded: false,
            exiting: false,
        };

        let result = event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error");

        state.app.on_exit();
        result
    }
}

/// Window, its GPU surface, and the per-window input and clock.
#[self_referencing]
struct WindowSurface {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSurface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size)
            .with_min_inner_size(config.min_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        WindowSurfaceTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }

    /// Runs one app frame; per-frame input is cleared afterwards.
    fn frame<A: CoreApp>(&mut self, app: &mut A, runtime: &mut RuntimeCtx) -> AppControl {
        self.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
                input_frame: fields.input_frame,
                time: fields.clock.tick(),
                runtime,
            };
            let control = app.on_frame(&mut ctx);

            fields.input_frame.clear();
            control
        })
    }
}

struct RuntimeState<A: CoreApp + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<WindowSurface>,
    /// The simulation pauses while nothing of the window is visible.
    occluded: bool,
    exiting: bool,
}

impl<A: CoreApp + 'static> RuntimeState<A> {
    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exiting = true;
        self.surface = None;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = self.surface.as_mut() else { return };

        let mut runtime = RuntimeCtx::default();
        let control = surface.frame(&mut self.app, &mut runtime);

        if control == AppControl::Exit || runtime.exit_requested() {
            log::debug!("exit requested by app");
            self.exit(event_loop);
        }
    }
}

impl<A: CoreApp + 'static> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.exiting {
            return;
        }

        match WindowSurface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(surface) => {
                log::debug!("window {:?} open", surface.id());
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(e) => {
                log::error!("failed to open the window: {e:#}");
                self.exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        // The field never settles, so keep frames coming while visible.
        if !self.occluded {
            if let Some(surface) = &self.surface {
                surface.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.exiting {
            return;
        }
        let Some(surface) = self.surface.as_mut() else { return };
        if surface.id() != window_id {
            return;
        }

        surface.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.exit(event_loop),

            WindowEvent::Resized(size) => {
                surface.resize(size);
                surface.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = surface.with_window(|w| w.inner_size());
                surface.resize(size);
                surface.request_redraw();
            }

            WindowEvent::Occluded(occluded) => {
                log::debug!("window occluded: {occluded}");
                self.occluded = occluded;
                if !occluded {
                    surface.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
