use crate::time::FrameTime;

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Value uploaded to `u_resolution`.
    #[inline]
    pub fn as_vec2(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Everything one frame callback needs. Built per frame, never stored.
#[derive(Debug, Copy, Clone)]
pub struct FrameContext {
    pub time: FrameTime,
    pub size: SurfaceSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_is_not_a_valid_surface() {
        assert!(SurfaceSize::new(640, 480).is_valid());
        assert!(!SurfaceSize::new(0, 480).is_valid());
        assert!(!SurfaceSize::default().is_valid());
    }
}
