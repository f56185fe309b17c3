use std::borrow::Cow;

use super::error::ShaderError;
use super::front::compile_front;
use super::program::{Program, ProgramSpec, StageId};

/// Compiled shader stages and the programs linked from them.
///
/// Created once at setup and owned by the field for its whole life.
pub struct ShaderLibrary {
    modules: Vec<wgpu::ShaderModule>,
    programs: Vec<Program>,
}

impl ShaderLibrary {
    /// Compiles every stage and links every program in `specs`.
    ///
    /// GPU modules are only created after the whole set validated.
    pub fn compile(device: &wgpu::Device, specs: &[ProgramSpec<'_>]) -> Result<Self, ShaderError> {
        let front = compile_front(specs)?;

        let modules = front
            .stages
            .into_iter()
            .enumerate()
            .map(|(i, stage)| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("logodust stage #{i}")),
                    source: wgpu::ShaderSource::Wgsl(Cow::Owned(stage.source)),
                })
            })
            .collect::<Vec<_>>();

        log::debug!(
            "compiled {} shader stages for {} programs",
            modules.len(),
            front.programs.len()
        );

        Ok(Self {
            modules,
            programs: front.programs,
        })
    }

    /// Program at `index`, in the order of the specs passed to [`compile`](Self::compile).
    pub fn program(&self, index: usize) -> &Program {
        &self.programs[index]
    }

    pub fn module(&self, stage: StageId) -> &wgpu::ShaderModule {
        &self.modules[stage.0]
    }

    /// Module holding the vertex (or compute) stage of `program`.
    pub fn vertex_module(&self, program: &Program) -> &wgpu::ShaderModule {
        self.module(program.vertex_stage())
    }

    /// Module holding the fragment stage of `program`.
    ///
    /// Feedback programs have none.
    pub fn fragment_module(&self, program: &Program) -> Option<&wgpu::ShaderModule> {
        program.fragment_stage().map(|id| self.module(id))
    }
}
