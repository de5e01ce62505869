use crate::backend::GraphicsBackend;
use crate::geometry::GeometryBuffer;
use crate::schedule::{FrameRequester, LoopState, RenderLoop};
use crate::shader::{AttributeBinding, AttributeResolution, LinkedProgram};

use super::{FrameContext, SurfaceSize, UniformSlots};

/// GPU objects and render loop for one shader source generation.
pub struct RenderSession<B: GraphicsBackend> {
    generation: u64,
    program: LinkedProgram<B>,
    resolution: AttributeResolution,
    attribute: AttributeBinding,
    geometry: GeometryBuffer<B>,
    uniforms: UniformSlots<B::UniformLocation>,
    render_loop: RenderLoop,
    size: SurfaceSize,
    clear_color: [f32; 4],
}

impl<B: GraphicsBackend> RenderSession<B> {
    /// Assembles a session from fully built parts. The loop starts `Idle`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        backend: &B,
        generation: u64,
        program: LinkedProgram<B>,
        resolution: AttributeResolution,
        attribute: AttributeBinding,
        geometry: GeometryBuffer<B>,
        size: SurfaceSize,
        clear_color: [f32; 4],
    ) -> Self {
        let uniforms = UniformSlots::resolve(backend, program.handle());
        Self {
            generation,
            program,
            resolution,
            attribute,
            geometry,
            uniforms,
            render_loop: RenderLoop::new(),
            size,
            clear_color,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn program(&self) -> &LinkedProgram<B> {
        &self.program
    }

    pub fn attribute(&self) -> &AttributeBinding {
        &self.attribute
    }

    pub fn attribute_resolution(&self) -> &AttributeResolution {
        &self.resolution
    }

    pub fn uniforms(&self) -> &UniformSlots<B::UniformLocation> {
        &self.uniforms
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn loop_state(&self) -> LoopState {
        self.render_loop.state()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.render_loop.frames_drawn()
    }

    pub(crate) fn render_loop_mut(&mut self) -> &mut RenderLoop {
        &mut self.render_loop
    }

    /// Issues one frame: viewport + clear, program, attribute, uniforms, draw.
    pub(crate) fn draw(&self, backend: &B, frame: &FrameContext) {
        backend.begin_frame(frame.size, self.clear_color);
        backend.use_program(self.program.handle());
        backend.bind_vertex_attribute(
            self.geometry.vertex_array(),
            self.geometry.buffer(),
            self.attribute.location,
            GeometryBuffer::<B>::COMPONENTS,
        );
        self.uniforms
            .upload(backend, frame.time.elapsed, frame.size.as_vec2());
        backend.draw_triangle_strip(self.geometry.vertex_count());
    }

    /// Stops the render loop, cancelling any scheduled callback.
    pub(crate) fn stop<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) {
        self.render_loop.stop(requester);
    }

    /// Deletes program, then both stages, then the quad geometry.
    ///
    /// The loop must already be stopped.
    pub(crate) fn release(self, backend: &B) {
        debug_assert_eq!(
            self.render_loop.state(),
            LoopState::Stopped,
            "session released while its render loop could still fire"
        );
        self.program.release(backend);
        self.geometry.release(backend);
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for RenderSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("generation", &self.generation)
            .field("program", &self.program)
            .field("attribute", &self.attribute)
            .field("size", &self.size)
            .field("loop", &self.render_loop.state())
            .finish_non_exhaustive()
    }
}
