use super::Vec2;

/// Drawable area in logical pixels.
///
/// Pointer input, particle canvas size and cursor size all live in this space.
/// Conversions to NDC treat a degenerate side as one pixel wide.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size as a shader `vec2`, never below one pixel per side.
    #[inline]
    pub fn canvas_size(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }

    /// Window point (+Y down, origin top-left) to NDC (+Y up, origin center).
    pub fn point_to_ndc(self, p: Vec2) -> Vec2 {
        let [w, h] = self.canvas_size();
        Vec2::new(p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0)
    }

    /// Window displacement to an NDC displacement. Flips Y.
    pub fn delta_to_ndc(self, d: Vec2) -> Vec2 {
        let [w, h] = self.canvas_size();
        Vec2::new(d.x / w * 2.0, -d.y / h * 2.0)
    }

    /// Half-extent in NDC of a square `size_px` wide.
    pub fn half_extent_ndc(self, size_px: f32) -> Vec2 {
        let [w, h] = self.canvas_size();
        Vec2::new(size_px / w, size_px / h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn corners_map_to_ndc_corners() {
        assert_eq!(VP.point_to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(VP.point_to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(VP.point_to_ndc(Vec2::new(400.0, 300.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn downward_motion_is_negative_y() {
        let d = VP.delta_to_ndc(Vec2::new(80.0, 60.0));
        assert!((d.x - 0.2).abs() < 1e-6);
        assert!((d.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn degenerate_viewport_stays_finite() {
        let vp = Viewport::new(0.0, 0.0);
        assert!(!vp.is_valid());
        assert_eq!(vp.canvas_size(), [1.0, 1.0]);
        assert!(vp.half_extent_ndc(150.0).is_finite());
    }
}
