use crate::coords::Vec2;

/// Window input the field reacts to, already in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse or touch position, +Y down.
    PointerMoved(Vec2),
    /// Mouse left the surface or the touch ended.
    PointerLeft,
}
