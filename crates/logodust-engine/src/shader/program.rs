use std::collections::HashMap;

use super::uniform::{UniformBlock, UniformBlockLayout, UniformLocation};

/// One shader stage: WGSL source text plus the entry point to use from it.
#[derive(Debug, Copy, Clone)]
pub struct StageSource<'a> {
    pub source: &'a str,
    pub entry_point: &'a str,
}

impl<'a> StageSource<'a> {
    pub const fn new(source: &'a str, entry_point: &'a str) -> Self {
        Self {
            source,
            entry_point,
        }
    }
}

/// Program description handed to the compiler.
///
/// Render programs have a `@vertex` entry point and a `@fragment` entry point.
/// Feedback programs (`feedback: Some(..)`) run their "vertex" stage as a
/// `@compute` entry point over every record and capture the named record fields
/// into a `read_write` storage array; they have no fragment stage.
#[derive(Debug, Copy, Clone)]
pub struct ProgramSpec<'a> {
    pub label: &'a str,
    pub vertex: StageSource<'a>,
    pub fragment: Option<StageSource<'a>>,
    /// Captured record fields, in record order.
    pub feedback: Option<&'a [&'a str]>,
    /// Uniform names to resolve after linking.
    pub uniforms: &'a [&'a str],
}

/// Index of a compiled stage inside the library.
///
/// Two programs built from the same source text share one `StageId`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StageId(pub(crate) usize);

/// Feedback-capture layout bound to a program before pipeline creation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackCapture {
    pub(crate) varyings: Vec<String>,
    pub(crate) record_stride: u32,
    pub(crate) group: u32,
    pub(crate) binding: u32,
}

impl FeedbackCapture {
    /// Captured field names in record order.
    pub fn varyings(&self) -> &[String] {
        &self.varyings
    }

    /// Byte size of one captured record (array stride of the output buffer).
    pub fn record_stride(&self) -> u32 {
        self.record_stride
    }

    /// Bind group index of the captured output buffer.
    pub fn group(&self) -> u32 {
        self.group
    }

    /// Binding index of the captured output buffer.
    pub fn binding(&self) -> u32 {
        self.binding
    }
}

/// A linked program.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) label: String,
    pub(crate) vertex: StageId,
    pub(crate) vertex_entry: String,
    pub(crate) fragment: Option<(StageId, String)>,
    pub(crate) uniforms: HashMap<String, Option<UniformLocation>>,
    pub(crate) uniform_blocks: Vec<UniformBlockLayout>,
    pub(crate) feedback: Option<FeedbackCapture>,
}

impl Program {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_stage(&self) -> StageId {
        self.vertex
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_stage(&self) -> Option<StageId> {
        self.fragment.as_ref().map(|(id, _)| *id)
    }

    pub fn fragment_entry(&self) -> Option<&str> {
        self.fragment.as_ref().map(|(_, entry)| entry.as_str())
    }

    pub fn feedback(&self) -> Option<&FeedbackCapture> {
        self.feedback.as_ref()
    }

    /// Resolved location of a declared uniform.
    ///
    /// `None` when the name was not declared or the shader has no such member;
    /// setters on [`UniformBlock`] ignore `None`.
    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied().flatten()
    }

    /// Creates a zeroed CPU staging block for the uniform buffer at `(group, binding)`.
    pub fn uniform_block(&self, group: u32, binding: u32) -> Option<UniformBlock> {
        self.uniform_blocks
            .iter()
            .find(|b| b.group == group && b.binding == binding)
            .map(|b| UniformBlock::new(*b))
    }
}
