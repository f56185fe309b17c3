use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the host.
///
/// Every callback runs on the event-loop thread, which is also the only thread
/// that touches the GPU.
pub trait App {
    /// Called for every window event before the runtime handles it.
    ///
    /// Resizes reach the app here first; the runtime reconfigures the surface
    /// right after.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the event loop is about to stop.
    fn on_exit(&mut self) {}
}
