use crate::shader::DEFAULT_ATTRIBUTE;

/// Engine behavior knobs.
///
/// Keep this minimal; everything else is dictated by the shader source.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Color the frame is cleared to before the quad is drawn (straight RGBA).
    pub clear_color: [f32; 4],

    /// Attribute bound when the vertex source declares none the scanner can see.
    pub fallback_attribute: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            fallback_attribute: DEFAULT_ATTRIBUTE.to_string(),
        }
    }
}
