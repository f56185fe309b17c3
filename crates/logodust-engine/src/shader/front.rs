//! Device-independent half of the compiler: stage dedup, naga validation,
//! link checks and reflection.

use std::collections::HashMap;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::error::ShaderError;
use super::program::{FeedbackCapture, Program, ProgramSpec, StageId};
use super::uniform::{UniformBlockLayout, UniformLocation};

/// A validated stage: its source text and parsed module.
#[derive(Debug)]
pub(crate) struct StageIr {
    pub source: String,
    pub module: naga::Module,
}

/// Result of [`compile_front`]: unique stages plus one program per spec.
#[derive(Debug)]
pub struct FrontOutput {
    pub(crate) stages: Vec<StageIr>,
    pub programs: Vec<Program>,
}

impl FrontOutput {
    /// Number of distinct compiled stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Compiles and links `specs` without touching a GPU device.
pub fn compile_front(specs: &[ProgramSpec<'_>]) -> Result<FrontOutput, ShaderError> {
    let mut by_source: HashMap<&str, StageId> = HashMap::new();
    let mut pending: Vec<(&str, &str)> = Vec::new();

    // Create every unique stage first, then compile them all.
    let stage_ids: Vec<(StageId, Option<StageId>)> = specs
        .iter()
        .map(|spec| {
            let vs = intern(spec.vertex.source, spec.label, &mut by_source, &mut pending);
            let fs = spec
                .fragment
                .map(|f| intern(f.source, spec.label, &mut by_source, &mut pending));
            (vs, fs)
        })
        .collect();

    let stages = pending
        .into_iter()
        .map(|(source, first_user)| compile_stage(source, first_user))
        .collect::<Result<Vec<_>, _>>()?;

    let programs = specs
        .iter()
        .zip(stage_ids)
        .map(|(spec, (vs, fs))| link(spec, vs, fs, &stages))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FrontOutput { stages, programs })
}

fn intern<'a>(
    source: &'a str,
    label: &'a str,
    by_source: &mut HashMap<&'a str, StageId>,
    pending: &mut Vec<(&'a str, &'a str)>,
) -> StageId {
    *by_source.entry(source).or_insert_with(|| {
        pending.push((source, label));
        StageId(pending.len() - 1)
    })
}

fn compile_stage(source: &str, program: &str) -> Result<StageIr, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        program: program.to_string(),
        diagnostics: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            program: program.to_string(),
            diagnostics: e.emit_to_string(source),
        })?;

    Ok(StageIr {
        source: source.to_string(),
        module,
    })
}

fn link(
    spec: &ProgramSpec<'_>,
    vs: StageId,
    fs: Option<StageId>,
    stages: &[StageIr],
) -> Result<Program, ShaderError> {
    let vertex_module = &stages[vs.0].module;

    let feedback = match spec.feedback {
        Some(varyings) => {
            require_entry(spec.label, vertex_module, spec.vertex.entry_point, naga::ShaderStage::Compute)?;
            if spec.fragment.is_some() {
                return Err(ShaderError::link(
                    spec.label,
                    "feedback programs do not rasterize and take no fragment stage",
                ));
            }
            Some(bind_feedback(spec.label, vertex_module, varyings)?)
        }
        None => {
            require_entry(spec.label, vertex_module, spec.vertex.entry_point, naga::ShaderStage::Vertex)?;
            let (Some(frag), Some(fs)) = (spec.fragment, fs) else {
                return Err(ShaderError::link(spec.label, "render program has no fragment stage"));
            };
            require_entry(spec.label, &stages[fs.0].module, frag.entry_point, naga::ShaderStage::Fragment)?;
            None
        }
    };

    // Reflect uniforms from each distinct stage of the program.
    let mut members: HashMap<String, UniformLocation> = HashMap::new();
    let mut uniform_blocks: Vec<UniformBlockLayout> = Vec::new();
    let mut reflected = vec![vs];
    if let Some(fs) = fs.filter(|fs| *fs != vs) {
        reflected.push(fs);
    }
    for id in reflected {
        reflect_uniforms(&stages[id.0].module, &mut members, &mut uniform_blocks);
    }

    let uniforms = spec
        .uniforms
        .iter()
        .map(|name| {
            let loc = members.get(*name).copied();
            if loc.is_none() {
                log::debug!("program `{}`: uniform `{name}` not found; writes will be ignored", spec.label);
            }
            (name.to_string(), loc)
        })
        .collect();

    Ok(Program {
        label: spec.label.to_string(),
        vertex: vs,
        vertex_entry: spec.vertex.entry_point.to_string(),
        fragment: spec
            .fragment
            .zip(fs)
            .map(|(f, id)| (id, f.entry_point.to_string())),
        uniforms,
        uniform_blocks,
        feedback,
    })
}

fn require_entry(
    program: &str,
    module: &naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<(), ShaderError> {
    match module.entry_points.iter().find(|ep| ep.name == name) {
        Some(ep) if ep.stage == stage => Ok(()),
        Some(ep) => Err(ShaderError::link(
            program,
            format!("entry point `{name}` is a {:?} stage, expected {stage:?}", ep.stage),
        )),
        None => Err(ShaderError::link(program, format!("entry point `{name}` not found"))),
    }
}

/// Finds the writable record array and checks that `varyings` name its fields in order.
fn bind_feedback(
    program: &str,
    module: &naga::Module,
    varyings: &[&str],
) -> Result<FeedbackCapture, ShaderError> {
    let output = module.global_variables.iter().find_map(|(_, var)| {
        let naga::AddressSpace::Storage { access } = var.space else { return None };
        if !access.contains(naga::StorageAccess::STORE) {
            return None;
        }
        let naga::TypeInner::Array { base, stride, .. } = module.types[var.ty].inner else {
            return None;
        };
        let naga::TypeInner::Struct { ref members, .. } = module.types[base].inner else {
            return None;
        };
        Some((var.binding.clone(), stride, members))
    });

    let Some((binding, stride, members)) = output else {
        return Err(ShaderError::link(
            program,
            "no read_write storage array of records to capture into",
        ));
    };
    let Some(binding) = binding else {
        return Err(ShaderError::link(program, "capture buffer has no resource binding"));
    };

    let names: Vec<&str> = members.iter().map(|m| m.name.as_deref().unwrap_or("")).collect();
    if names.as_slice() != varyings {
        return Err(ShaderError::link(
            program,
            format!("captured varyings {varyings:?} do not match record fields {names:?}"),
        ));
    }

    Ok(FeedbackCapture {
        varyings: varyings.iter().map(|v| v.to_string()).collect(),
        record_stride: stride,
        group: binding.group,
        binding: binding.binding,
    })
}

fn reflect_uniforms(
    module: &naga::Module,
    members: &mut HashMap<String, UniformLocation>,
    blocks: &mut Vec<UniformBlockLayout>,
) {
    let ctx = module.to_ctx();

    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(binding) = var.binding.as_ref() else { continue };
        let ty = &module.types[var.ty].inner;

        blocks.push(UniformBlockLayout {
            group: binding.group,
            binding: binding.binding,
            size: ty.size(ctx),
        });

        match ty {
            naga::TypeInner::Struct { members: fields, .. } => {
                for field in fields {
                    let Some(name) = field.name.as_ref() else { continue };
                    members.entry(name.clone()).or_insert(UniformLocation {
                        group: binding.group,
                        binding: binding.binding,
                        offset: field.offset,
                        size: module.types[field.ty].inner.size(ctx),
                    });
                }
            }
            _ => {
                if let Some(name) = var.name.as_ref() {
                    members.entry(name.clone()).or_insert(UniformLocation {
                        group: binding.group,
                        binding: binding.binding,
                        offset: 0,
                        size: ty.size(ctx),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::StageSource;

    const RENDER: &str = r#"
struct Params {
    size: vec2<f32>,
    scale: f32,
}

@group(0) @binding(0) var<uniform> params: Params;

@vertex
fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(params.size * params.scale, f32(i), 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}

@fragment
fn fs_alt() -> @location(0) vec4<f32> {
    return vec4<f32>(0.5);
}
"#;

    const FRAGMENT_ONLY: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 1.0, 0.0, 1.0);
}
"#;

    const FEEDBACK: &str = r#"
struct Rec {
    position: vec2<f32>,
    velocity: vec2<f32>,
    origin: vec2<f32>,
    alpha: f32,
}

@group(0) @binding(1) var<storage, read> src: array<Rec>;
@group(0) @binding(2) var<storage, read_write> dst: array<Rec>;

@compute @workgroup_size(64)
fn cs_main(@builtin(global_invocation_id) id: vec3<u32>) {
    let i = id.x;
    if (i >= arrayLength(&src)) {
        return;
    }
    dst[i] = src[i];
}
"#;

    fn render_spec<'a>(label: &'a str, fs_src: &'a str, fs_entry: &'a str) -> ProgramSpec<'a> {
        ProgramSpec {
            label,
            vertex: StageSource::new(RENDER, "vs_main"),
            fragment: Some(StageSource::new(fs_src, fs_entry)),
            feedback: None,
            uniforms: &["size", "scale", "missing"],
        }
    }

    const CAPTURE: &[&str] = &["position", "velocity", "origin", "alpha"];

    fn feedback_spec(varyings: &'static [&'static str]) -> ProgramSpec<'static> {
        ProgramSpec {
            label: "advect",
            vertex: StageSource::new(FEEDBACK, "cs_main"),
            fragment: None,
            feedback: Some(varyings),
            uniforms: &[],
        }
    }

    // ── dedup ─────────────────────────────────────────────────────────────

    #[test]
    fn shared_sources_compile_once() {
        let out = compile_front(&[
            render_spec("a", RENDER, "fs_main"),
            render_spec("b", RENDER, "fs_alt"),
            render_spec("c", FRAGMENT_ONLY, "fs_main"),
        ])
        .unwrap();

        assert_eq!(out.stage_count(), 2);
        assert_eq!(out.programs[0].vertex_stage(), out.programs[1].vertex_stage());
        assert_eq!(out.programs[0].vertex_stage(), out.programs[2].vertex_stage());
        assert_eq!(out.programs[1].fragment_entry(), Some("fs_alt"));
        assert_ne!(out.programs[2].fragment_stage(), out.programs[0].fragment_stage());
    }

    #[test]
    fn programs_keep_input_order() {
        let out = compile_front(&[
            feedback_spec(CAPTURE),
            render_spec("draw", RENDER, "fs_main"),
        ])
        .unwrap();
        assert_eq!(out.programs[0].label(), "advect");
        assert_eq!(out.programs[1].label(), "draw");
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn uniforms_resolve_to_member_offsets() {
        let out = compile_front(&[render_spec("a", RENDER, "fs_main")]).unwrap();
        let p = &out.programs[0];

        let size = p.uniform("size").unwrap();
        assert_eq!((size.group, size.binding, size.offset, size.size), (0, 0, 0, 8));
        let scale = p.uniform("scale").unwrap();
        assert_eq!((scale.offset, scale.size), (8, 4));

        let block = p.uniform_block(0, 0).unwrap();
        assert_eq!(block.size(), 16);
    }

    #[test]
    fn missing_uniform_is_absent_not_an_error() {
        let out = compile_front(&[render_spec("a", RENDER, "fs_main")]).unwrap();
        assert_eq!(out.programs[0].uniform("missing"), None);
        assert_eq!(out.programs[0].uniform("never_declared"), None);
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn syntax_error_is_compile_error() {
        let err = compile_front(&[render_spec("broken", "fn nope( {", "fs_main")]).unwrap_err();
        match err {
            ShaderError::Compile { program, diagnostics } => {
                assert_eq!(program, "broken");
                assert!(!diagnostics.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_is_link_error() {
        let err = compile_front(&[render_spec("a", RENDER, "fs_nope")]).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn wrong_stage_kind_is_link_error() {
        let spec = ProgramSpec {
            label: "a",
            vertex: StageSource::new(RENDER, "fs_main"),
            fragment: Some(StageSource::new(RENDER, "fs_main")),
            feedback: None,
            uniforms: &[],
        };
        assert!(matches!(compile_front(&[spec]), Err(ShaderError::Link { .. })));
    }

    // ── feedback ──────────────────────────────────────────────────────────

    #[test]
    fn feedback_binds_capture_layout() {
        let out = compile_front(&[feedback_spec(CAPTURE)]).unwrap();
        let capture = out.programs[0].feedback().unwrap();
        assert_eq!(capture.record_stride(), 32);
        assert_eq!((capture.group(), capture.binding()), (0, 2));
        assert_eq!(capture.varyings().len(), 4);
    }

    #[test]
    fn feedback_varying_mismatch_is_link_error() {
        let err = compile_front(&[feedback_spec(&["position", "velocity", "alpha"])]).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn render_program_has_no_feedback() {
        let out = compile_front(&[render_spec("a", RENDER, "fs_main")]).unwrap();
        assert!(out.programs[0].feedback().is_none());
    }
}
