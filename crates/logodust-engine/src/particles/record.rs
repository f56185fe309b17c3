use bytemuck::{Pod, Zeroable};

/// One particle as stored in the GPU buffers (32 bytes).
///
///  offset  0  position  [f32; 2]   instance loc 0
///  offset  8  velocity  [f32; 2]
///  offset 16  origin    [f32; 2]
///  offset 24  alpha     f32        instance loc 1
///  offset 28  (padding to the WGSL array stride)
///
/// Positions are logo pixels relative to the surface center, +Y up.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleRecord {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub origin: [f32; 2],
    pub alpha: f32,
    pub _pad: f32,
}

impl ParticleRecord {
    /// Record fields written by the advection pass, in record order.
    pub const FIELDS: [&'static str; 4] = ["position", "velocity", "origin", "alpha"];

    /// A particle sitting still at its origin.
    pub fn at_rest(origin: [f32; 2], alpha: f32) -> Self {
        Self {
            position: origin,
            velocity: [0.0, 0.0],
            origin,
            alpha,
            _pad: 0.0,
        }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32,
            offset: 24,
            shader_location: 1,
        },
    ];

    /// Per-instance layout used when the compositor draws a particle buffer.
    pub(crate) fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleRecord>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-frame inputs of the advection pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AdvectParams {
    pub delta_time: f32,
    pub time: f32,
    /// Logical surface size.
    pub canvas_size: [f32; 2],
    /// Logical pixels per logo pixel.
    pub spacing: f32,
    pub force_strength: f32,
    pub stiffness: f32,
    /// Fraction of velocity kept after one second.
    pub damping: f32,
    pub shimmer: f32,
}

/// CPU twin of `cs_advect` in `particle_advect.wgsl`.
///
/// `force` is the decoded field value at the particle, in `[-1, 1]`.
pub fn advect(p: &ParticleRecord, force: [f32; 2], params: &AdvectParams) -> ParticleRecord {
    let dt = params.delta_time;

    let shimmer = [
        (params.time * 1.7 + p.origin[1] * 0.13).sin() * params.shimmer,
        (params.time * 1.3 + p.origin[0] * 0.11).cos() * params.shimmer,
    ];

    let keep = params.damping.powf(dt);
    let mut out = *p;
    for i in 0..2 {
        let push = force[i] * params.force_strength;
        let spring = (p.origin[i] - p.position[i]) * params.stiffness;
        let accel = push + spring + shimmer[i];

        let velocity = (p.velocity[i] + accel * dt) * keep;
        out.velocity[i] = velocity;
        out.position[i] = p.position[i] + velocity * dt;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(dt: f32) -> AdvectParams {
        AdvectParams {
            delta_time: dt,
            time: 1.5,
            canvas_size: [800.0, 600.0],
            spacing: 2.0,
            force_strength: 2500.0,
            stiffness: 30.0,
            damping: 0.05,
            shimmer: 4.0,
        }
    }

    #[test]
    fn record_matches_wgsl_stride() {
        assert_eq!(std::mem::size_of::<ParticleRecord>(), 32);
        assert_eq!(std::mem::offset_of!(ParticleRecord, alpha), 24);
    }

    #[test]
    fn zero_dt_with_neutral_field_changes_nothing() {
        let p = ParticleRecord {
            position: [3.0, -4.0],
            velocity: [10.0, 2.5],
            origin: [0.0, 0.0],
            alpha: 0.75,
            _pad: 0.0,
        };
        let out = advect(&p, [0.0, 0.0], &params(0.0));
        assert_eq!(out, p);
    }

    #[test]
    fn spring_pulls_toward_origin() {
        let p = ParticleRecord {
            position: [10.0, 0.0],
            ..ParticleRecord::at_rest([0.0, 0.0], 1.0)
        };
        let params = AdvectParams { shimmer: 0.0, ..params(1.0 / 60.0) };
        let out = advect(&p, [0.0, 0.0], &params);
        assert!(out.velocity[0] < 0.0);
        assert!(out.position[0] < 10.0);
        assert_eq!(out.origin, p.origin);
        assert_eq!(out.alpha, p.alpha);
    }

    #[test]
    fn push_moves_resting_particle() {
        let p = ParticleRecord::at_rest([5.0, 5.0], 1.0);
        let params = AdvectParams { shimmer: 0.0, ..params(1.0 / 60.0) };
        let out = advect(&p, [1.0, 0.0], &params);
        assert!(out.position[0] > 5.0);
        assert_eq!(out.position[1], 5.0);
    }

    #[test]
    fn integration_is_deterministic() {
        let mut a = ParticleRecord::at_rest([1.0, 2.0], 0.5);
        let mut b = a;
        let params = params(1.0 / 60.0);
        for _ in 0..120 {
            a = advect(&a, [0.3, -0.2], &params);
            b = advect(&b, [0.3, -0.2], &params);
        }
        assert_eq!(a, b);
    }
}
