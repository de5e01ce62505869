//! Static full-screen quad geometry.

use bytemuck::{Pod, Zeroable};

use crate::backend::GraphicsBackend;
use crate::error::{EngineError, EngineResult};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2], // clip space
}

/// Unit square over clip space `[-1, 1]²`, in triangle-strip order.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0] },
];

/// The session's only vertex data: one immutable buffer holding [`FULLSCREEN_QUAD`].
///
/// On modern contexts a vertex array object is allocated alongside, since
/// core-style contexts refuse attribute setup without one bound.
#[must_use = "geometry owns GPU objects and must be released"]
pub struct GeometryBuffer<B: GraphicsBackend> {
    buffer: B::Buffer,
    vertex_array: Option<B::VertexArray>,
}

impl<B: GraphicsBackend> GeometryBuffer<B> {
    /// Components per vertex.
    pub const COMPONENTS: i32 = 2;

    pub fn new(backend: &B) -> EngineResult<Self> {
        let vertex_array = backend
            .create_vertex_array()
            .map_err(|reason| EngineError::resource("vertex array", reason))?;

        let buffer = match backend.create_vertex_buffer(bytemuck::cast_slice(&FULLSCREEN_QUAD)) {
            Ok(b) => b,
            Err(reason) => {
                if let Some(vao) = vertex_array {
                    backend.delete_vertex_array(vao);
                }
                return Err(EngineError::resource("vertex buffer", reason));
            }
        };

        Ok(Self { buffer, vertex_array })
    }

    pub fn buffer(&self) -> B::Buffer {
        self.buffer
    }

    pub fn vertex_array(&self) -> Option<B::VertexArray> {
        self.vertex_array
    }

    pub fn vertex_count(&self) -> i32 {
        FULLSCREEN_QUAD.len() as i32
    }

    pub fn release(self, backend: &B) {
        backend.delete_buffer(self.buffer);
        if let Some(vao) = self.vertex_array {
            backend.delete_vertex_array(vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use crate::backend::ContextVersion;

    #[test]
    fn quad_covers_clip_space_as_strip() {
        let xs: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.pos[1]).collect();
        assert_eq!(xs, [-1.0, 1.0, -1.0, 1.0]);
        assert_eq!(ys, [-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&FULLSCREEN_QUAD).len(), 4 * 2 * 4);
    }

    #[test]
    fn modern_context_gets_vertex_array() {
        let backend = RecordingBackend::new();
        let geo = GeometryBuffer::new(&backend).unwrap();
        assert!(geo.vertex_array().is_some());
        assert_eq!(geo.vertex_count(), 4);
        geo.release(&backend);
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn legacy_context_has_no_vertex_array() {
        let backend = RecordingBackend::with_version(ContextVersion::Legacy);
        let geo = GeometryBuffer::new(&backend).unwrap();
        assert!(geo.vertex_array().is_none());
        geo.release(&backend);
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn buffer_failure_releases_vertex_array() {
        let backend = RecordingBackend::new();
        backend.fail_buffer_creation(true);
        assert!(GeometryBuffer::new(&backend).is_err());
        assert_eq!(backend.live_objects(), 0);
    }
}
