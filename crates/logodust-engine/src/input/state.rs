use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::InputEvent;

/// Pointer state of the window.
///
/// Per-frame movement is recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in logical pixels; `None` while the pointer is outside.
    pub pointer_pos: Option<Vec2>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::PointerMoved(pos) => {
                if let Some(prev) = self.pointer_pos {
                    frame.pointer_delta = frame.pointer_delta + (pos - prev);
                }
                self.pointer_pos = Some(pos);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(Vec2::new(x, y))
    }

    #[test]
    fn first_move_sets_position_without_delta() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(10.0, 20.0));
        assert_eq!(state.pointer_pos, Some(Vec2::new(10.0, 20.0)));
        assert_eq!(frame.pointer_delta, Vec2::zero());
    }

    #[test]
    fn moves_accumulate_within_a_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(0.0, 0.0));
        state.apply_event(&mut frame, moved(3.0, 1.0));
        state.apply_event(&mut frame, moved(5.0, -2.0));
        assert_eq!(frame.pointer_delta, Vec2::new(5.0, -2.0));

        frame.clear();
        assert_eq!(frame.pointer_delta, Vec2::zero());
    }

    #[test]
    fn leaving_clears_position_and_reentry_does_not_jump() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);

        state.apply_event(&mut frame, moved(400.0, 300.0));
        assert_eq!(frame.pointer_delta, Vec2::zero());
    }
}
