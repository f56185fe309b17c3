use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use logodust_engine::core::{App, AppControl, FrameCtx};
use logodust_engine::logo::ImageResolver;
use logodust_engine::{FieldConfig, FieldInput, LogoField};
use winit::event::WindowEvent;
use winit::window::WindowId;

const BASE_TITLE: &str = "logodust";

/// The currently chosen logo reference, as shown in the window title.
///
/// Cleared when the core reports that the latest request failed.
#[derive(Debug, Default)]
struct Selection {
    reference: Option<String>,
    request_id: u64,
}

impl Selection {
    fn title(&self) -> String {
        match &self.reference {
            Some(r) => format!("{BASE_TITLE} - {r}"),
            None => BASE_TITLE.to_string(),
        }
    }
}

/// Host application: owns the field and the logo selection.
pub struct ViewerApp {
    config: FieldConfig,
    resolver: Arc<dyn ImageResolver>,

    field: Option<LogoField>,
    selection: Selection,
    /// Requested before the field existed; sent on the first frame.
    pending: Option<String>,
    title_dirty: bool,

    failures: Receiver<u64>,
    failure_tx: mpsc::Sender<u64>,
}

impl ViewerApp {
    pub fn new(config: FieldConfig, resolver: Arc<dyn ImageResolver>, initial_logo: Option<String>) -> Self {
        let (failure_tx, failures) = mpsc::channel();
        Self {
            config,
            resolver,
            field: None,
            selection: Selection::default(),
            pending: initial_logo,
            title_dirty: true,
            failures,
            failure_tx,
        }
    }

    fn select(&mut self, reference: String) {
        match self.field.as_mut() {
            Some(field) => {
                let request = field.request_logo(reference.clone());
                self.selection = Selection {
                    reference: Some(reference),
                    request_id: request.id,
                };
                self.title_dirty = true;
            }
            None => self.pending = Some(reference),
        }
    }

    fn ensure_field(&mut self, ctx: &FrameCtx<'_, '_>) -> bool {
        if self.field.is_some() {
            return true;
        }

        match LogoField::new(&*ctx.gpu, self.config.clone(), Arc::clone(&self.resolver)) {
            Ok(mut field) => {
                let tx = self.failure_tx.clone();
                field.set_logo_failed_hook(move |failure| {
                    let _ = tx.send(failure.request.id);
                });
                self.field = Some(field);

                if let Some(reference) = self.pending.take() {
                    self.select(reference);
                }
                true
            }
            Err(e) => {
                log::error!("particle field setup failed: {e}");
                false
            }
        }
    }

    fn drain_failures(&mut self) {
        while let Ok(id) = self.failures.try_recv() {
            if id == self.selection.request_id && self.selection.reference.is_some() {
                log::info!("forgetting logo selection after failed request #{id}");
                self.selection.reference = None;
                self.title_dirty = true;
            }
        }
    }
}

impl App for ViewerApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(field) = self.field.as_mut() {
                    field.on_resize();
                }
            }
            WindowEvent::DroppedFile(path) => {
                log::info!("logo dropped: {}", path.display());
                self.select(path.display().to_string());
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.ensure_field(ctx) {
            return AppControl::Exit;
        }

        self.drain_failures();
        if self.title_dirty {
            ctx.window.set_title(&self.selection.title());
            self.title_dirty = false;
        }

        let input = FieldInput {
            time: ctx.time.elapsed,
            delta_time: ctx.time.dt,
            pointer: ctx.input.pointer_pos,
            movement: ctx.input_frame.pointer_delta,
        };

        let Some(field) = self.field.as_mut() else {
            return AppControl::Continue;
        };
        ctx.render(|rctx, target| {
            let outcome = field.tick(rctx, target, input);
            log::trace!("tick: {outcome:?}");
        })
    }

    fn on_exit(&mut self) {
        if let Some(field) = &self.field {
            log::info!(
                "exiting after {} frames ({} particles)",
                field.ticks(),
                field.particle_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_shows_selection() {
        let mut s = Selection::default();
        assert_eq!(s.title(), "logodust");
        s.reference = Some("logo.png".to_string());
        assert_eq!(s.title(), "logodust - logo.png");
    }
}
