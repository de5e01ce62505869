use glow::HasContext;

use crate::session::SurfaceSize;
use crate::source::StageKind;

use super::{ContextVersion, GraphicsBackend};

/// [`GraphicsBackend`] over a live `glow` context.
///
/// Every GL call in the crate goes through this type. The context must stay
/// current on the calling thread for the backend's whole lifetime; `GlDevice`
/// makes it current before the backend is built and never releases it.
pub struct GlowBackend {
    gl: glow::Context,
    version: ContextVersion,
}

impl GlowBackend {
    pub fn new(gl: glow::Context, version: ContextVersion) -> Self {
        Self { gl, version }
    }
}

impl GraphicsBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn context_version(&self) -> ContextVersion {
        self.version
    }

    fn create_shader(&self, stage: StageKind) -> Result<glow::Shader, String> {
        let ty = match stage {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        };
        // SAFETY: context is current (type invariant).
        unsafe { self.gl.create_shader(ty) }
    }

    fn compile_shader(&self, shader: glow::Shader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn link_program(
        &self,
        program: glow::Program,
        vertex: glow::Shader,
        fragment: glow::Shader,
    ) -> bool {
        unsafe {
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_vertex_buffer(&self, data: &[u8]) -> Result<glow::Buffer, String> {
        unsafe {
            let buffer = self.gl.create_buffer()?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_vertex_array(&self) -> Result<Option<glow::VertexArray>, String> {
        match self.version {
            ContextVersion::Modern => unsafe { self.gl.create_vertex_array().map(Some) },
            ContextVersion::Legacy => Ok(None),
        }
    }

    fn delete_vertex_array(&self, vertex_array: glow::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn begin_frame(&self, size: SurfaceSize, clear: [f32; 4]) {
        let [r, g, b, a] = clear;
        unsafe {
            self.gl.viewport(0, 0, size.width as i32, size.height as i32);
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn use_program(&self, program: glow::Program) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn bind_vertex_attribute(
        &self,
        vertex_array: Option<glow::VertexArray>,
        buffer: glow::Buffer,
        location: u32,
        components: i32,
    ) {
        unsafe {
            if vertex_array.is_some() {
                self.gl.bind_vertex_array(vertex_array);
            }
            self.gl.enable_vertex_attrib_array(location);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
        }
    }

    fn set_uniform_f32(&self, location: &glow::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) }
    }

    fn set_uniform_vec2(&self, location: &glow::UniformLocation, value: [f32; 2]) {
        unsafe { self.gl.uniform_2_f32(Some(location), value[0], value[1]) }
    }

    fn set_uniform_mat4(&self, location: &glow::UniformLocation, value: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, value) }
    }

    fn draw_triangle_strip(&self, vertex_count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLE_STRIP, 0, vertex_count) }
    }
}
