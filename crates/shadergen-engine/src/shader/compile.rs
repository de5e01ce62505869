use crate::backend::GraphicsBackend;
use crate::error::{EngineError, EngineResult};
use crate::source::StageKind;

/// One successfully compiled shader stage.
///
/// Owns its backend object; [`CompiledStage::release`] consumes the value, so
/// a stage can only ever be deleted once.
#[derive(Debug)]
#[must_use = "a compiled stage owns a GPU object and must be released"]
pub struct CompiledStage<S> {
    kind: StageKind,
    shader: S,
    diagnostics: Option<String>,
}

impl<S: Copy> CompiledStage<S> {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn handle(&self) -> S {
        self.shader
    }

    /// Non-empty info log of a successful compile (driver warnings).
    pub fn diagnostics(&self) -> Option<&str> {
        self.diagnostics.as_deref()
    }

    pub fn release<B>(self, backend: &B)
    where
        B: GraphicsBackend<Shader = S>,
    {
        backend.delete_shader(self.shader);
    }
}

/// Compiles one stage against the backend's current context.
///
/// On failure the backend object is deleted before returning, so no partial
/// stage survives. The context tier is part of the log line because it decides
/// which GLSL dialect the driver accepts.
pub fn compile_stage<B: GraphicsBackend>(
    backend: &B,
    kind: StageKind,
    source: &str,
) -> EngineResult<CompiledStage<B::Shader>> {
    let shader = backend
        .create_shader(kind)
        .map_err(|reason| EngineError::resource("shader object", reason))?;

    if !backend.compile_shader(shader, source) {
        let log = backend.shader_info_log(shader);
        backend.delete_shader(shader);

        log::error!(
            "{kind} shader failed to compile ({} context): {}",
            backend.context_version(),
            log.trim_end()
        );
        log::debug!("{kind} shader source:\n{source}");

        let log = if log.trim().is_empty() {
            "(driver returned an empty info log)".to_string()
        } else {
            log
        };
        return Err(EngineError::Compile { stage: kind, log });
    }

    let log = backend.shader_info_log(shader);
    let diagnostics = (!log.trim().is_empty()).then_some(log);
    if let Some(d) = &diagnostics {
        log::warn!("{kind} shader compiled with diagnostics: {}", d.trim_end());
    }

    Ok(CompiledStage { kind, shader, diagnostics })
}
