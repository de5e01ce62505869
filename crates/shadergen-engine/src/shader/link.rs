use crate::backend::GraphicsBackend;
use crate::error::{EngineError, EngineResult};
use crate::source::StageKind;

use super::CompiledStage;

/// An executable program plus the two stages it was linked from.
///
/// Only exists if both stages compiled and the link succeeded. The stages are
/// kept so they can be deleted in teardown order after the program.
#[must_use = "a linked program owns GPU objects and must be released"]
pub struct LinkedProgram<B: GraphicsBackend> {
    program: B::Program,
    vertex: CompiledStage<B::Shader>,
    fragment: CompiledStage<B::Shader>,
}

impl<B: GraphicsBackend> LinkedProgram<B> {
    pub fn handle(&self) -> B::Program {
        self.program
    }

    pub fn vertex(&self) -> &CompiledStage<B::Shader> {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage<B::Shader> {
        &self.fragment
    }

    /// Deletes the program, then the vertex stage, then the fragment stage.
    pub fn release(self, backend: &B) {
        backend.delete_program(self.program);
        self.vertex.release(backend);
        self.fragment.release(backend);
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for LinkedProgram<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("program", &self.program)
            .field("vertex", &self.vertex.handle())
            .field("fragment", &self.fragment.handle())
            .finish()
    }
}

/// Links a vertex and a fragment stage into one program.
///
/// Takes ownership of both stages. On any failure the program object and both
/// stages are deleted before the error is returned.
pub fn link_program<B: GraphicsBackend>(
    backend: &B,
    vertex: CompiledStage<B::Shader>,
    fragment: CompiledStage<B::Shader>,
) -> EngineResult<LinkedProgram<B>> {
    let release_stages = |vertex: CompiledStage<B::Shader>, fragment: CompiledStage<B::Shader>| {
        vertex.release(backend);
        fragment.release(backend);
    };

    if vertex.kind() != StageKind::Vertex || fragment.kind() != StageKind::Fragment {
        let log = format!(
            "expected a vertex and a fragment stage, got {} and {}",
            vertex.kind(),
            fragment.kind()
        );
        release_stages(vertex, fragment);
        return Err(EngineError::Link { log });
    }

    let program = match backend.create_program() {
        Ok(p) => p,
        Err(reason) => {
            release_stages(vertex, fragment);
            return Err(EngineError::resource("program object", reason));
        }
    };

    if !backend.link_program(program, vertex.handle(), fragment.handle()) {
        let log = backend.program_info_log(program);
        backend.delete_program(program);
        release_stages(vertex, fragment);

        log::error!("shader program failed to link: {}", log.trim_end());
        return Err(EngineError::Link { log });
    }

    Ok(LinkedProgram { program, vertex, fragment })
}
