//! Session lifecycle management.
//!
//! [`ShaderEngine`] is the only component allowed to create or destroy GPU
//! state. It enforces:
//! - build order: compile vertex → compile fragment → link → bind attribute →
//!   allocate quad → start loop, rolling back on any failure
//! - teardown order: stop loop (cancel pending frame) → delete program →
//!   delete stages → delete quad
//! - at most one live session; a new source fully tears down the old one first

mod config;
mod engine;
mod status;

pub use config::EngineConfig;
pub use engine::ShaderEngine;
pub use status::{Severity, StatusMessage};
