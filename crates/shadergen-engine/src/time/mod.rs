//! Time subsystem.
//!
//! Frame timing for the render loop, decoupled from the window runtime so it
//! can be driven from tests. One `FrameClock` per render loop; `tick()` once
//! per rendered frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
