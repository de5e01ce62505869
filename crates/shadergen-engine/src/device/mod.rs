//! GL device + window surface management.
//!
//! This module is responsible for:
//! - creating the window together with a GL config/display (glutin-winit)
//! - walking the context ladder, modern tier before legacy tier
//! - making the context current and loading `glow` against it
//! - resizing and presenting the window surface

mod gl_device;
mod init;
mod ladder;

pub use gl_device::GlDevice;
pub use init::GlInit;
pub use ladder::{context_ladder, ContextApiKind, ContextRequest};
