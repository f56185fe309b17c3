use crate::coords::{ColorRgba, Viewport};
use crate::particles::{ParticleBuffers, ParticleRecord};
use crate::render::layout;
use crate::render::RenderTarget;
use crate::shader::{Program, ShaderError, ShaderLibrary, UniformBlock, UniformLocation};

/// Look of the particle sprites.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CompositeParams {
    pub clear: ColorRgba,
    pub tint: ColorRgba,
    /// Logical pixels per logo pixel.
    pub spacing: f32,
    /// Sprite edge length in logical pixels.
    pub sprite_size: f32,
}

/// One instanced sprite per particle, four strip vertices each.
pub struct ParticleCompositor {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    uniforms: UniformBlock,
    uniform_buffer: wgpu::Buffer,
    canvas_size: Option<UniformLocation>,
    spacing: Option<UniformLocation>,
    sprite_size: Option<UniformLocation>,
    color: Option<UniformLocation>,
}

impl ParticleCompositor {
    pub(crate) fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        program: &Program,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let uniforms = program
            .uniform_block(0, 0)
            .ok_or_else(|| ShaderError::link(program.label(), "no uniform block at @group(0) @binding(0)"))?;
        let (Some(fragment), Some(fragment_entry)) = (library.fragment_module(program), program.fragment_entry()) else {
            return Err(ShaderError::link(program.label(), "render program without a fragment stage"));
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("logodust particle draw bgl"),
            entries: &[layout::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                &uniforms,
            )],
        });
        let uniform_buffer = layout::uniform_buffer(device, "logodust particle draw ubo", &uniforms);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("logodust particle draw bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout =
            layout::pipeline_layout(device, "logodust particle draw pipeline layout", &bind_group_layout);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: library.vertex_module(program),
                entry_point: Some(program.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[ParticleRecord::instance_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: layout::strip_primitive(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_group,
            canvas_size: program.uniform("canvas_size"),
            spacing: program.uniform("spacing"),
            sprite_size: program.uniform("sprite_size"),
            color: program.uniform("color"),
            uniforms,
            uniform_buffer,
        })
    }

    /// Clears the surface to `params.clear` and draws the buffer the last
    /// advection pass wrote (the current read buffer after its swap).
    pub fn composite(
        &mut self,
        queue: &wgpu::Queue,
        target: &mut RenderTarget<'_>,
        particles: Option<&ParticleBuffers>,
        viewport: Viewport,
        params: &CompositeParams,
    ) {
        let t = params.tint;
        self.uniforms
            .set_vec2(self.canvas_size, viewport.canvas_size());
        self.uniforms.set_f32(self.spacing, params.spacing);
        self.uniforms.set_f32(self.sprite_size, params.sprite_size);
        self.uniforms.set_vec4(self.color, [t.r, t.g, t.b, t.a]);
        layout::write_uniforms(queue, &self.uniform_buffer, &self.uniforms);

        let mut rpass = layout::color_pass(target.encoder, "logodust particle pass", target.color_view, Some(params.clear));

        let Some(particles) = particles else { return };
        if particles.count() == 0 {
            return;
        }

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, particles.read().slice(..));
        rpass.draw(0..4, 0..particles.count());
    }
}
