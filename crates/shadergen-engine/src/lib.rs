//! Shadergen engine crate.
//!
//! Turns an externally supplied vertex/fragment GLSL pair into a continuously
//! rendering GPU program, and owns the platform + GL runtime pieces needed to
//! show it in a window.

pub mod backend;
pub mod device;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod schedule;
pub mod session;
pub mod shader;
pub mod source;
pub mod time;
pub mod window;
pub mod core;

pub mod logging;

pub use error::{EngineError, EngineResult};
pub use lifecycle::{EngineConfig, ShaderEngine, Severity, StatusMessage};
pub use source::{ShaderSourcePair, StageKind};
