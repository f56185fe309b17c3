use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::coords::Vec2;
use crate::input::InputEvent;

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            Some(InputEvent::PointerMoved(to_logical(window, *position)))
        }

        // Touch is treated as the single pointer; lifting the finger ends it.
        WindowEvent::Touch(touch) => match touch.phase {
            winit::event::TouchPhase::Started | winit::event::TouchPhase::Moved => {
                Some(InputEvent::PointerMoved(to_logical(window, touch.location)))
            }
            winit::event::TouchPhase::Ended | winit::event::TouchPhase::Cancelled => {
                Some(InputEvent::PointerLeft)
            }
        },

        _ => None,
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}
