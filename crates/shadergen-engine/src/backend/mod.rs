//! Graphics backend seam.
//!
//! The pipeline talks to the GPU exclusively through [`GraphicsBackend`]. The
//! trait mirrors the small slice of the GL object model the engine needs:
//! shaders, programs, one static vertex buffer, attribute/uniform lookup by
//! name, and a triangle-strip draw.
//!
//! All methods take `&self`; GL state is process-wide and the engine drives it
//! from a single thread.

mod gl;
#[cfg(any(test, feature = "test-helpers"))]
pub mod recording;

use std::fmt;

use crate::session::SurfaceSize;
use crate::source::StageKind;

pub use self::gl::GlowBackend;

/// Capability tier of the graphics context in use.
///
/// The tier decides which shader dialects the driver accepts, so it is
/// recorded on the backend and reported to the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContextVersion {
    /// GLES 3.0 / desktop GL 3.3.
    Modern,
    /// GLES 2.0 / desktop GL 2.1.
    Legacy,
}

impl fmt::Display for ContextVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextVersion::Modern => f.write_str("modern"),
            ContextVersion::Legacy => f.write_str("legacy"),
        }
    }
}

pub trait GraphicsBackend {
    type Shader: Copy + Eq + fmt::Debug;
    type Program: Copy + Eq + fmt::Debug;
    type Buffer: Copy + Eq + fmt::Debug;
    type VertexArray: Copy + Eq + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn context_version(&self) -> ContextVersion;

    // ── shaders ───────────────────────────────────────────────────────────

    fn create_shader(&self, stage: StageKind) -> Result<Self::Shader, String>;

    /// Uploads `source` into `shader`, compiles it and returns the compile status.
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;

    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn delete_shader(&self, shader: Self::Shader);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&self) -> Result<Self::Program, String>;

    /// Attaches both stages to `program`, links it and returns the link status.
    fn link_program(
        &self,
        program: Self::Program,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> bool;

    fn program_info_log(&self, program: Self::Program) -> String;

    fn delete_program(&self, program: Self::Program);

    /// `None` is the GL `-1` sentinel.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    // ── geometry ──────────────────────────────────────────────────────────

    /// Allocates a static vertex buffer initialized with `data`.
    fn create_vertex_buffer(&self, data: &[u8]) -> Result<Self::Buffer, String>;

    fn delete_buffer(&self, buffer: Self::Buffer);

    /// Returns `Ok(None)` on contexts without vertex array objects.
    fn create_vertex_array(&self) -> Result<Option<Self::VertexArray>, String>;

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    // ── per frame ─────────────────────────────────────────────────────────

    /// Sets the viewport to `size` and clears the color buffer.
    fn begin_frame(&self, size: SurfaceSize, clear: [f32; 4]);

    fn use_program(&self, program: Self::Program);

    /// Enables `location` and points it at `buffer` as tightly packed,
    /// non-normalized `f32` vectors of `components` elements.
    fn bind_vertex_attribute(
        &self,
        vertex_array: Option<Self::VertexArray>,
        buffer: Self::Buffer,
        location: u32,
        components: i32,
    );

    fn set_uniform_f32(&self, location: &Self::UniformLocation, value: f32);

    fn set_uniform_vec2(&self, location: &Self::UniformLocation, value: [f32; 2]);

    fn set_uniform_mat4(&self, location: &Self::UniformLocation, value: &[f32; 16]);

    fn draw_triangle_strip(&self, vertex_count: i32);
}
