use std::path::PathBuf;

use crate::source::StageKind;

/// Convenience result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures that abort a session build.
///
/// Every variant except `SourceRead` and `EmptySource` is produced by the
/// pipeline itself; those two come from source ingestion, before the engine
/// touches any GL state.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// No suitable graphics context could be created for the surface.
    #[error(
        "no supported OpenGL/GLES context is available ({reason}); check that your \
         platform, driver and graphics card all support OpenGL"
    )]
    ContextUnavailable { reason: String },

    /// A shader source blob was empty or whitespace only.
    #[error("{stage} shader source is empty")]
    EmptySource { stage: StageKind },

    /// A shader source file could not be read.
    #[error("failed to read shader source {path}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend rejected one stage.
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },

    /// Both stages compiled but the program did not link.
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },

    /// The bound attribute is absent from the linked program.
    #[error(
        "attribute '{name}' not found in vertex shader; ensure it has an \
         'attribute vec2 {name};' (or similar) declaration"
    )]
    AttributeNotFound { name: String },

    /// The backend refused to allocate an object.
    #[error("failed to create {what}: {reason}")]
    ResourceCreation { what: &'static str, reason: String },
}

impl EngineError {
    pub(crate) fn resource(what: &'static str, reason: impl Into<String>) -> Self {
        Self::ResourceCreation { what, reason: reason.into() }
    }
}
