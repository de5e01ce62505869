//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and wires them to the GL
//! device and the shader engine. Frame pacing comes from the engine's render
//! loop: each drawn frame requests exactly one more redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
