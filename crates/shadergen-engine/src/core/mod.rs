//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the host application. The host never sees frame tokens or GL handles; it
//! submits source pairs and reacts to window events through [`EngineCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::EngineCtx;
