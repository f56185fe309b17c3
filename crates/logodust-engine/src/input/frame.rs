use crate::coords::Vec2;

/// Input accumulated over one frame; cleared by the runtime after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Sum of pointer movements this frame, in logical pixels (+Y down).
    ///
    /// Movement is only accumulated between two known positions; entering the
    /// window does not produce a jump.
    pub pointer_delta: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.pointer_delta = Vec2::zero();
    }
}
