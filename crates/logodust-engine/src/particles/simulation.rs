use crate::force_field::ForceFieldTarget;
use crate::render::layout;
use crate::shader::{Program, ShaderError, ShaderLibrary, UniformBlock, UniformLocation};

use super::buffers::ParticleBuffers;
use super::record::{AdvectParams, ParticleRecord};

/// Must match `@workgroup_size` of `cs_advect`.
pub const WORKGROUP_SIZE: u32 = 64;

const PARAMS_BINDING: u32 = 0;
const SOURCE_BINDING: u32 = 1;
const FORCE_FIELD_BINDING: u32 = 3;
const SAMPLER_BINDING: u32 = 4;

struct AdvectUniforms {
    canvas_size: Option<UniformLocation>,
    delta_time: Option<UniformLocation>,
    time: Option<UniformLocation>,
    spacing: Option<UniformLocation>,
    force_strength: Option<UniformLocation>,
    stiffness: Option<UniformLocation>,
    damping: Option<UniformLocation>,
    shimmer: Option<UniformLocation>,
    particle_count: Option<UniformLocation>,
}

impl AdvectUniforms {
    fn resolve(program: &Program) -> Self {
        Self {
            canvas_size: program.uniform("canvas_size"),
            delta_time: program.uniform("delta_time"),
            time: program.uniform("time"),
            spacing: program.uniform("spacing"),
            force_strength: program.uniform("force_strength"),
            stiffness: program.uniform("stiffness"),
            damping: program.uniform("damping"),
            shimmer: program.uniform("shimmer"),
            particle_count: program.uniform("particle_count"),
        }
    }
}

/// Bind groups for both swap directions, tagged with the resources they reference.
struct BoundPair {
    groups: [wgpu::BindGroup; 2],
    key: (u64, u64),
}

/// Advects every particle once per frame with a compute pass.
///
/// Reads the current read buffer, writes the other one, then swaps them.
pub struct ParticleSimulation {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    uniforms: UniformBlock,
    uniform_buffer: wgpu::Buffer,
    locations: AdvectUniforms,

    output_binding: u32,
    bound: Option<BoundPair>,
}

impl ParticleSimulation {
    pub(crate) fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        program: &Program,
    ) -> Result<Self, ShaderError> {
        let Some(capture) = program.feedback() else {
            return Err(ShaderError::link(program.label(), "advection program has no feedback capture"));
        };

        let stride = std::mem::size_of::<ParticleRecord>() as u32;
        if capture.record_stride() != stride || capture.group() != 0 {
            return Err(ShaderError::link(
                program.label(),
                format!(
                    "captured records are {} bytes in group {}, particle buffers hold {stride}-byte records in group 0",
                    capture.record_stride(),
                    capture.group()
                ),
            ));
        }

        let uniforms = program
            .uniform_block(0, PARAMS_BINDING)
            .ok_or_else(|| ShaderError::link(program.label(), "no uniform block at @group(0) @binding(0)"))?;

        let output_binding = capture.binding();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("logodust advect bgl"),
            entries: &[
                layout::uniform_entry(PARAMS_BINDING, wgpu::ShaderStages::COMPUTE, &uniforms),
                layout::storage_entry(SOURCE_BINDING, true),
                layout::storage_entry(output_binding, false),
                layout::texture_entry(FORCE_FIELD_BINDING, wgpu::ShaderStages::COMPUTE),
                layout::sampler_entry(SAMPLER_BINDING, wgpu::ShaderStages::COMPUTE),
            ],
        });

        let pipeline_layout = layout::pipeline_layout(device, "logodust advect pipeline layout", &bind_group_layout);

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&pipeline_layout),
            module: library.vertex_module(program),
            entry_point: Some(program.vertex_entry()),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler: layout::linear_clamp_sampler(device, "logodust force field sampler"),
            uniform_buffer: layout::uniform_buffer(device, "logodust advect ubo", &uniforms),
            locations: AdvectUniforms::resolve(program),
            uniforms,
            output_binding,
            bound: None,
        })
    }

    /// Records one advection pass into `encoder` and swaps the buffers.
    pub fn step(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &mut ParticleBuffers,
        field: &ForceFieldTarget,
        params: &AdvectParams,
    ) {
        let loc = &self.locations;
        let u = &mut self.uniforms;
        u.set_vec2(loc.canvas_size, params.canvas_size);
        u.set_f32(loc.delta_time, params.delta_time);
        u.set_f32(loc.time, params.time);
        u.set_f32(loc.spacing, params.spacing);
        u.set_f32(loc.force_strength, params.force_strength);
        u.set_f32(loc.stiffness, params.stiffness);
        u.set_f32(loc.damping, params.damping);
        u.set_f32(loc.shimmer, params.shimmer);
        u.set_u32(loc.particle_count, buffers.count());
        layout::write_uniforms(queue, &self.uniform_buffer, &self.uniforms);

        let key = (buffers.generation(), field.generation());
        if self.bound.as_ref().is_none_or(|b| b.key != key) {
            self.bound = Some(self.bind(device, buffers, field, key));
        }
        let Some(bound) = self.bound.as_ref() else { return };

        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("logodust advect pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &bound.groups[buffers.read_index()], &[]);
            cpass.dispatch_workgroups(buffers.count().div_ceil(WORKGROUP_SIZE), 1, 1);
        }

        buffers.swap();
    }

    fn bind(
        &self,
        device: &wgpu::Device,
        buffers: &ParticleBuffers,
        field: &ForceFieldTarget,
        key: (u64, u64),
    ) -> BoundPair {
        log::debug!("rebuilding advect bind groups (buffers gen {}, field gen {})", key.0, key.1);

        let group = |read: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("logodust advect bind group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: PARAMS_BINDING,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: SOURCE_BINDING,
                        resource: buffers.slot(read).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: self.output_binding,
                        resource: buffers.slot(1 - read).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: FORCE_FIELD_BINDING,
                        resource: wgpu::BindingResource::TextureView(field.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: SAMPLER_BINDING,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            })
        };

        BoundPair {
            groups: [group(0), group(1)],
            key,
        }
    }
}
