//! The field's shader programs, keyed by role.

use crate::particles::ParticleRecord;
use crate::shader::{ProgramSpec, StageSource};

pub(crate) const PARTICLE_ADVECT_WGSL: &str = include_str!("../shaders/particle_advect.wgsl");
pub(crate) const PARTICLE_DRAW_WGSL: &str = include_str!("../shaders/particle_draw.wgsl");
pub(crate) const CURSOR_WGSL: &str = include_str!("../shaders/cursor.wgsl");

/// Index of each program in [`specs`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Role {
    ParticleAdvect = 0,
    ParticleDraw = 1,
    CursorDraw = 2,
    CursorDebug = 3,
}

impl Role {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

const ADVECT_UNIFORMS: &[&str] = &[
    "canvas_size",
    "delta_time",
    "time",
    "spacing",
    "force_strength",
    "stiffness",
    "damping",
    "shimmer",
    "particle_count",
];

pub(crate) fn specs() -> [ProgramSpec<'static>; 4] {
    [
        ProgramSpec {
            label: "particle-advect",
            vertex: StageSource::new(PARTICLE_ADVECT_WGSL, "cs_advect"),
            fragment: None,
            feedback: Some(&ParticleRecord::FIELDS),
            uniforms: ADVECT_UNIFORMS,
        },
        ProgramSpec {
            label: "particle-draw",
            vertex: StageSource::new(PARTICLE_DRAW_WGSL, "vs_main"),
            fragment: Some(StageSource::new(PARTICLE_DRAW_WGSL, "fs_main")),
            feedback: None,
            uniforms: &["canvas_size", "spacing", "sprite_size", "color"],
        },
        ProgramSpec {
            label: "cursor-draw",
            vertex: StageSource::new(CURSOR_WGSL, "vs_main"),
            fragment: Some(StageSource::new(CURSOR_WGSL, "fs_force")),
            feedback: None,
            uniforms: &["center"],
        },
        ProgramSpec {
            label: "cursor-debug",
            vertex: StageSource::new(CURSOR_WGSL, "vs_main"),
            fragment: Some(StageSource::new(CURSOR_WGSL, "fs_debug")),
            feedback: None,
            uniforms: &["center"],
        },
    ]
}
