/// Initialization parameters for the GL layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or driver requirement exists.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Synchronize presentation with the display refresh.
    ///
    /// With vsync off the render loop still paces itself on redraw requests,
    /// but frames are presented as fast as the driver accepts them.
    pub vsync: bool,

    /// Try the modern tier (GLES 3.0 / GL 3.3) first.
    ///
    /// Disabling this forces the legacy tier, which is useful to reproduce
    /// what users on old drivers see.
    pub allow_modern: bool,

    /// Fall back to the legacy tier (GLES 2.0 / GL 2.1) when no modern context
    /// can be created.
    pub allow_legacy: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            vsync: true,
            allow_modern: true,
            allow_legacy: true,
        }
    }
}
