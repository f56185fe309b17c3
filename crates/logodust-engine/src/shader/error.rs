use thiserror::Error;

/// Shader compilation/link failure.
///
/// Both variants are fatal to pipeline setup.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A stage failed to parse or validate. `diagnostics` is the rendered naga report.
    #[error("shader stage used by `{program}` failed to compile:\n{diagnostics}")]
    Compile { program: String, diagnostics: String },

    /// A program's stages do not fit together (missing entry point, wrong stage
    /// kind, feedback layout mismatch).
    #[error("program `{program}` failed to link: {reason}")]
    Link { program: String, reason: String },
}

impl ShaderError {
    pub(crate) fn link(program: &str, reason: impl Into<String>) -> Self {
        Self::Link {
            program: program.to_string(),
            reason: reason.into(),
        }
    }
}
