use std::time::Duration;

use crate::coords::ColorRgba;
use crate::cursor::CursorParams;

/// Tuning of the particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Surface clear color behind the particles.
    pub clear_color: ColorRgba,
    pub particle_color: ColorRgba,

    pub cursor: CursorParams,

    /// Acceleration (logo px/s²) of a fully saturated push.
    pub force_strength: f32,
    /// Spring constant pulling particles back to their origin (1/s²).
    pub stiffness: f32,
    /// Fraction of velocity kept after one second, in `(0, 1]`.
    pub damping: f32,
    /// Idle drift amplitude (logo px/s²).
    pub shimmer: f32,

    /// Logical pixels per logo pixel.
    pub spacing: f32,
    /// Sprite edge length in logical pixels.
    pub sprite_size: f32,

    /// Logos are scaled down to fit this many pixels on each axis.
    pub logo_max_dimension: u32,

    /// Quiet period after the last resize before resources are rebuilt.
    pub resize_quiet: Duration,

    /// Draw the cursor mesh over the particles.
    pub debug_cursor: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::black(),
            particle_color: ColorRgba::new(1.0, 1.0, 1.0, 1.0),
            cursor: CursorParams::default(),
            force_strength: 2500.0,
            stiffness: 30.0,
            damping: 0.05,
            shimmer: 2.0,
            spacing: 2.0,
            sprite_size: 3.0,
            logo_max_dimension: 250,
            resize_quiet: Duration::from_millis(300),
            debug_cursor: false,
        }
    }
}

impl FieldConfig {
    /// Returns a copy with out-of-range values pulled back into range.
    pub fn sanitized(mut self) -> Self {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            log::warn!("damping {} out of (0, 1]; using default", self.damping);
            self.damping = Self::default().damping;
        }
        if !(self.spacing > 0.0) {
            self.spacing = Self::default().spacing;
        }
        if !(self.cursor.max_speed > 0.0) {
            self.cursor.max_speed = CursorParams::default().max_speed;
        }
        self.sprite_size = self.sprite_size.max(0.5);
        self.logo_max_dimension = self.logo_max_dimension.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_already_sane() {
        assert_eq!(FieldConfig::default().sanitized(), FieldConfig::default());
    }

    #[test]
    fn sanitize_repairs_damping_and_spacing() {
        let cfg = FieldConfig {
            damping: 0.0,
            spacing: f32::NAN,
            logo_max_dimension: 0,
            ..FieldConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.damping, 0.05);
        assert_eq!(cfg.spacing, 2.0);
        assert_eq!(cfg.logo_max_dimension, 1);
    }
}
