use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Viewport};

/// Encoded force meaning "no push" (components in `[-1, 1]` mapped to `[0, 1]`).
pub const NEUTRAL_FORCE: [f32; 2] = [0.5, 0.5];

/// Shape and strength of the cursor mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorParams {
    /// Edge length of the cursor square, in logical pixels.
    ///
    /// The default of 75 keeps the push area tight around the pointer; the
    /// at-rest mesh is exactly this wide on screen.
    pub size_px: f32,
    /// Movement length (NDC units per frame) at which the push saturates.
    pub max_speed: f32,
    /// Push strength at saturation.
    pub force_factor: f32,
    /// How much of the push leans sideways, away from the motion axis.
    pub lateral_weight: f32,
}

impl Default for CursorParams {
    fn default() -> Self {
        Self {
            size_px: 75.0,
            max_speed: 0.3,
            force_factor: 3.0,
            lateral_weight: 0.0,
        }
    }
}

/// One cursor mesh vertex (24 bytes).
///
///  offset  0  offset  [f32; 2]   loc 0  (NDC, relative to the pointer)
///  offset  8  uv      [f32; 2]   loc 1
///  offset 16  force   [f32; 2]   loc 2  (encoded, 0.5 = none)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct CursorVertex {
    pub offset: [f32; 2],
    pub uv: [f32; 2],
    pub force: [f32; 2],
}

impl CursorVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // offset
        1 => Float32x2, // uv
        2 => Float32x2  // force
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CursorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    fn new(offset: Vec2, uv: Vec2, force: [f32; 2]) -> Self {
        Self {
            offset: offset.to_array(),
            uv: uv.to_array(),
            force,
        }
    }
}

/// Cursor geometry for one frame.
///
/// Only the first `vertex_count` entries of `vertices` are meaningful. They form
/// a triangle strip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorMesh {
    /// Pointer position in NDC (+Y up). Vertex offsets are relative to it.
    pub center: Vec2,
    pub vertices: [CursorVertex; 8],
    pub vertex_count: u32,
}

impl CursorMesh {
    pub fn active(&self) -> &[CursorVertex] {
        &self.vertices[..self.vertex_count as usize]
    }
}

/// Builds the cursor mesh for a pointer at `position` that moved by `movement`
/// this frame. Both are logical pixels with +Y down, like window events.
///
/// A still pointer yields a 4-vertex square with neutral force. A moving one
/// yields 8 vertices: the square's front half, then a back half smeared
/// backwards by the full movement so fast strokes leave a trail of push.
pub fn generate(
    params: &CursorParams,
    position: Vec2,
    movement: Vec2,
    viewport: Viewport,
) -> CursorMesh {
    let center = viewport.point_to_ndc(position);
    let m = viewport.delta_to_ndc(movement);
    let half = viewport.half_extent_ndc(params.size_px);

    let mut mesh = CursorMesh {
        center,
        vertices: [CursorVertex::default(); 8],
        vertex_count: 0,
    };

    if m.is_zero() || !m.is_finite() {
        let corners = [
            (Vec2::new(-half.x, -half.y), Vec2::new(0.0, 0.0)),
            (Vec2::new(half.x, -half.y), Vec2::new(1.0, 0.0)),
            (Vec2::new(-half.x, half.y), Vec2::new(0.0, 1.0)),
            (Vec2::new(half.x, half.y), Vec2::new(1.0, 1.0)),
        ];
        for (slot, (offset, uv)) in mesh.vertices.iter_mut().zip(corners) {
            *slot = CursorVertex::new(offset, uv, NEUTRAL_FORCE);
        }
        mesh.vertex_count = 4;
        return mesh;
    }

    let speed = m.length();
    let dir = m.normalized();
    let perp = dir.perp();

    let v1 = Vec2::new(dir.x * half.x, dir.y * half.y);
    let v2 = Vec2::new(perp.x * half.x, perp.y * half.y);

    let scale = speed.min(params.max_speed) / params.max_speed.max(f32::EPSILON) * params.force_factor;
    let right = encode_force((dir + perp * params.lateral_weight) * scale);
    let left = encode_force((dir - perp * params.lateral_weight) * scale);

    let front_right = v1 + v2;
    let front_left = v1 - v2;
    let inner_right = v2;
    let inner_left = -v2;
    let back_inner_right = inner_right - m;
    let back_inner_left = inner_left - m;
    let back_right = -v1 + v2 - m;
    let back_left = -v1 - v2 - m;

    let uv_front_right = uv_from_normal(dir + perp);
    let uv_front_left = uv_from_normal(dir - perp);
    let uv_back_right = uv_from_normal(-dir + perp);
    let uv_back_left = uv_from_normal(-dir - perp);
    let uv_mid_right = uv_front_right.lerp(uv_back_right, 0.5);
    let uv_mid_left = uv_front_left.lerp(uv_back_left, 0.5);

    mesh.vertices = [
        CursorVertex::new(front_right, uv_front_right, right),
        CursorVertex::new(front_left, uv_front_left, left),
        CursorVertex::new(inner_right, uv_mid_right, right),
        CursorVertex::new(inner_left, uv_mid_left, left),
        CursorVertex::new(back_inner_right, uv_mid_right, right),
        CursorVertex::new(back_inner_left, uv_mid_left, left),
        CursorVertex::new(back_right, uv_back_right, right),
        CursorVertex::new(back_left, uv_back_left, left),
    ];
    mesh.vertex_count = 8;
    mesh
}

/// Maps a force in `[-1, 1]` (clamped) to texel values in `[0, 1]`.
fn encode_force(force: Vec2) -> [f32; 2] {
    let f = force.clamp(-1.0, 1.0);
    [(f.x + 1.0) * 0.5, (f.y + 1.0) * 0.5]
}

/// Diagonal unit-square corner directions land on the mask's corners.
fn uv_from_normal(v: Vec2) -> Vec2 {
    (v.normalized() * std::f32::consts::SQRT_2 + Vec2::splat(1.0)) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    fn offset(v: &CursorVertex) -> Vec2 {
        Vec2::new(v.offset[0], v.offset[1])
    }

    // ── stationary ─────────────────────────────────────────────────────────

    #[test]
    fn still_pointer_emits_neutral_square() {
        let mesh = generate(&CursorParams::default(), Vec2::new(400.0, 300.0), Vec2::zero(), VIEWPORT);

        assert_eq!(mesh.vertex_count, 4);
        assert!(approx(mesh.center, Vec2::zero()));
        assert!(mesh.active().iter().all(|v| v.force == NEUTRAL_FORCE));

        let half = Vec2::new(75.0 / 800.0, 75.0 / 600.0);
        assert!(approx(offset(&mesh.vertices[0]), -half));
        assert!(approx(offset(&mesh.vertices[3]), half));
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
    }

    #[test]
    fn default_square_is_75_logical_px_on_screen() {
        let mesh = generate(&CursorParams::default(), Vec2::new(400.0, 300.0), Vec2::zero(), VIEWPORT);

        // NDC spans 2 units across the viewport.
        let span = offset(&mesh.vertices[3]) - offset(&mesh.vertices[0]);
        assert!((span.x * VIEWPORT.width / 2.0 - 75.0).abs() < 1e-3);
        assert!((span.y * VIEWPORT.height / 2.0 - 75.0).abs() < 1e-3);
    }

    #[test]
    fn center_is_y_up_ndc() {
        let mesh = generate(&CursorParams::default(), Vec2::new(0.0, 0.0), Vec2::zero(), VIEWPORT);
        assert!(approx(mesh.center, Vec2::new(-1.0, 1.0)));

        let mesh = generate(&CursorParams::default(), Vec2::new(800.0, 600.0), Vec2::zero(), VIEWPORT);
        assert!(approx(mesh.center, Vec2::new(1.0, -1.0)));
    }

    // ── moving ─────────────────────────────────────────────────────────────

    #[test]
    fn moving_pointer_emits_eight_vertices() {
        let mesh = generate(&CursorParams::default(), Vec2::new(100.0, 100.0), Vec2::new(12.0, -5.0), VIEWPORT);
        assert_eq!(mesh.vertex_count, 8);
        assert_eq!(mesh.active().len(), 8);
    }

    #[test]
    fn back_vertices_are_inner_minus_movement() {
        let movement = Vec2::new(40.0, 30.0);
        let mesh = generate(&CursorParams::default(), Vec2::new(400.0, 300.0), movement, VIEWPORT);
        let m = Vec2::new(40.0 / 800.0 * 2.0, -30.0 / 600.0 * 2.0);

        let v = &mesh.vertices;
        assert!(approx(offset(&v[4]), offset(&v[2]) - m));
        assert!(approx(offset(&v[5]), offset(&v[3]) - m));

        // Outer back corners mirror the front corners, then smear by the same vector.
        assert!(approx(offset(&v[6]), -offset(&v[1]) - m));
        assert!(approx(offset(&v[7]), -offset(&v[0]) - m));
    }

    #[test]
    fn force_alternates_between_sides() {
        let params = CursorParams {
            lateral_weight: 0.5,
            ..CursorParams::default()
        };
        let mesh = generate(&params, Vec2::new(400.0, 300.0), Vec2::new(10.0, 0.0), VIEWPORT);
        let v = &mesh.vertices;

        for i in (0..8).step_by(2) {
            assert_eq!(v[i].force, v[0].force);
            assert_eq!(v[i + 1].force, v[1].force);
        }
        assert_ne!(v[0].force, v[1].force);
    }

    #[test]
    fn push_points_along_motion_and_saturates() {
        let params = CursorParams::default();

        // Rightward motion pushes +X; Y stays neutral with no lateral weight.
        let slow = generate(&params, Vec2::new(400.0, 300.0), Vec2::new(4.0, 0.0), VIEWPORT);
        assert!(slow.vertices[0].force[0] > 0.5);
        assert!((slow.vertices[0].force[1] - 0.5).abs() < 1e-6);

        // Far past max speed: clamped to full push.
        let fast = generate(&params, Vec2::new(400.0, 300.0), Vec2::new(700.0, 0.0), VIEWPORT);
        assert_eq!(fast.vertices[0].force, [1.0, 0.5]);

        // Upward screen motion (-Y in pixels) pushes +Y in the particle frame.
        let up = generate(&params, Vec2::new(400.0, 300.0), Vec2::new(0.0, -20.0), VIEWPORT);
        assert!(up.vertices[0].force[1] > 0.5);
    }

    #[test]
    fn strip_order_keeps_right_and_left_alternating() {
        let mesh = generate(&CursorParams::default(), Vec2::new(400.0, 300.0), Vec2::new(0.0, -30.0), VIEWPORT);
        let m = Vec2::new(0.0, 0.1);
        let dir = m.normalized();
        let perp = dir.perp();

        // Even vertices sit on the `perp` side of the motion axis, odd on the other.
        for (i, v) in mesh.active().iter().enumerate() {
            let side = offset(v).x * perp.x + offset(v).y * perp.y;
            if i % 2 == 0 {
                assert!(side > 0.0, "vertex {i} on wrong side");
            } else {
                assert!(side < 0.0, "vertex {i} on wrong side");
            }
        }
    }

    #[test]
    fn mid_uvs_are_midpoints() {
        let mesh = generate(&CursorParams::default(), Vec2::new(200.0, 200.0), Vec2::new(3.0, 7.0), VIEWPORT);
        let v = &mesh.vertices;
        let mid = |a: [f32; 2], b: [f32; 2]| Vec2::new((a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5);

        assert!(approx(Vec2::new(v[2].uv[0], v[2].uv[1]), mid(v[0].uv, v[6].uv)));
        assert!(approx(Vec2::new(v[3].uv[0], v[3].uv[1]), mid(v[1].uv, v[7].uv)));
        assert_eq!(v[2].uv, v[4].uv);
    }
}
