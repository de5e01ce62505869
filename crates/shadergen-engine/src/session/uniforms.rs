use crate::backend::GraphicsBackend;

pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_PROJECTION: &str = "projectionMatrix";
pub const U_MODEL_VIEW: &str = "modelViewMatrix";

/// Column-major 4×4 identity.
///
/// There is no camera or transform system; both matrix uniforms receive this.
pub const IDENTITY_MAT4: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Locations of the uniforms the engine knows how to feed.
///
/// Resolved once per program. A `None` slot means the program does not
/// declare (or the driver optimized out) that uniform, and its upload is
/// skipped every frame.
#[derive(Debug, Clone)]
pub struct UniformSlots<L> {
    pub time: Option<L>,
    pub resolution: Option<L>,
    pub projection: Option<L>,
    pub model_view: Option<L>,
}

impl<L: Clone + std::fmt::Debug> UniformSlots<L> {
    pub fn resolve<B>(backend: &B, program: B::Program) -> Self
    where
        B: GraphicsBackend<UniformLocation = L>,
    {
        let slots = Self {
            time: backend.uniform_location(program, U_TIME),
            resolution: backend.uniform_location(program, U_RESOLUTION),
            projection: backend.uniform_location(program, U_PROJECTION),
            model_view: backend.uniform_location(program, U_MODEL_VIEW),
        };
        log::debug!(
            "uniforms: {U_TIME}={} {U_RESOLUTION}={} {U_PROJECTION}={} {U_MODEL_VIEW}={}",
            slots.time.is_some(),
            slots.resolution.is_some(),
            slots.projection.is_some(),
            slots.model_view.is_some(),
        );
        slots
    }

    /// Uploads every present slot for one frame.
    pub fn upload<B>(&self, backend: &B, elapsed: f32, resolution: [f32; 2])
    where
        B: GraphicsBackend<UniformLocation = L>,
    {
        if let Some(loc) = &self.time {
            backend.set_uniform_f32(loc, elapsed);
        }
        if let Some(loc) = &self.resolution {
            backend.set_uniform_vec2(loc, resolution);
        }
        if let Some(loc) = &self.projection {
            backend.set_uniform_mat4(loc, &IDENTITY_MAT4);
        }
        if let Some(loc) = &self.model_view {
            backend.set_uniform_mat4(loc, &IDENTITY_MAT4);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_none()
            && self.resolution.is_none()
            && self.projection.is_none()
            && self.model_view.is_none()
    }
}
