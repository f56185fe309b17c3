use wgpu::util::DeviceExt;

use crate::coords::{Vec2, Viewport};
use crate::cursor::{self, CursorParams, CursorVertex};
use crate::render::layout;
use crate::render::RenderTarget;
use crate::shader::{Program, ShaderError, ShaderLibrary, UniformBlock, UniformLocation};

use super::mask::{radial_mask_pixels, RADIAL_MASK_SIZE};
use super::target::{ForceFieldTarget, FORCE_FIELD_FORMAT, NEUTRAL_CLEAR};

const MAX_CURSOR_VERTICES: u64 = 8;

/// Draws the cursor mesh into the force field.
///
/// The same mesh can also be drawn over the visible surface as a debug overlay.
pub struct ForceFieldRenderer {
    params: CursorParams,

    pipeline: wgpu::RenderPipeline,
    debug_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    uniforms: UniformBlock,
    uniform_buffer: wgpu::Buffer,
    center: Option<UniformLocation>,

    vertex_buffer: wgpu::Buffer,
    /// Vertices written this frame; zero while the pointer is away.
    vertex_count: u32,
}

impl ForceFieldRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        library: &ShaderLibrary,
        program: &Program,
        debug_program: &Program,
        surface_format: wgpu::TextureFormat,
        params: CursorParams,
    ) -> Result<Self, ShaderError> {
        let uniforms = program
            .uniform_block(0, 0)
            .ok_or_else(|| ShaderError::link(program.label(), "no uniform block at @group(0) @binding(0)"))?;
        let center = program.uniform("center");

        let mask_texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("logodust radial mask"),
                size: wgpu::Extent3d {
                    width: RADIAL_MASK_SIZE,
                    height: RADIAL_MASK_SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &radial_mask_pixels(RADIAL_MASK_SIZE),
        );
        let mask_view = mask_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = layout::linear_clamp_sampler(device, "logodust radial mask sampler");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("logodust cursor bgl"),
            entries: &[
                layout::uniform_entry(0, wgpu::ShaderStages::VERTEX, &uniforms),
                layout::texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                layout::sampler_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let uniform_buffer = layout::uniform_buffer(device, "logodust cursor ubo", &uniforms);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("logodust cursor bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&mask_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = layout::pipeline_layout(device, "logodust cursor pipeline layout", &bind_group_layout);
        let pipeline = cursor_pipeline(device, library, program, &pipeline_layout, FORCE_FIELD_FORMAT)?;
        let debug_pipeline = cursor_pipeline(device, library, debug_program, &pipeline_layout, surface_format)?;

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("logodust cursor vbo"),
            size: MAX_CURSOR_VERTICES * std::mem::size_of::<CursorVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            params,
            pipeline,
            debug_pipeline,
            bind_group,
            uniforms,
            uniform_buffer,
            center,
            vertex_buffer,
            vertex_count: 0,
        })
    }

    /// Clears `target` to zero force and, when the pointer is over the surface,
    /// draws this frame's cursor mesh into it.
    ///
    /// `pointer` and `movement` are logical pixels; `viewport` is the logical
    /// surface size.
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &ForceFieldTarget,
        pointer: Option<Vec2>,
        movement: Vec2,
        viewport: Viewport,
    ) {
        self.vertex_count = 0;

        if let Some(position) = pointer {
            let mesh = cursor::generate(&self.params, position, movement, viewport);

            self.uniforms.set_vec2(self.center, mesh.center.to_array());
            layout::write_uniforms(queue, &self.uniform_buffer, &self.uniforms);
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(mesh.active()));
            self.vertex_count = mesh.vertex_count;
        }

        let mut rpass = layout::color_pass(encoder, "logodust force field pass", target.view(), Some(NEUTRAL_CLEAR));
        if self.vertex_count == 0 {
            return;
        }

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }

    /// Draws the mesh from the last [`render`](Self::render) over the surface.
    pub fn draw_debug(&self, target: &mut RenderTarget<'_>) {
        if self.vertex_count == 0 {
            return;
        }

        let mut rpass = layout::color_pass(target.encoder, "logodust cursor debug pass", target.color_view, None);
        rpass.set_pipeline(&self.debug_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

fn cursor_pipeline(
    device: &wgpu::Device,
    library: &ShaderLibrary,
    program: &Program,
    pipeline_layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let (Some(fragment), Some(fragment_entry)) = (library.fragment_module(program), program.fragment_entry()) else {
        return Err(ShaderError::link(program.label(), "render program without a fragment stage"));
    };

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(program.label()),
        layout: Some(pipeline_layout),
        vertex: wgpu::VertexState {
            module: library.vertex_module(program),
            entry_point: Some(program.vertex_entry()),
            compilation_options: Default::default(),
            buffers: &[CursorVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: layout::strip_primitive(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    }))
}
