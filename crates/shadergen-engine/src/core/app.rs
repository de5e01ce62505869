use winit::event::WindowEvent;

use crate::schedule::FrameOutcome;

use super::ctx::EngineCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the host.
pub trait App {
    /// Called once the window and GL context exist. Typically submits the
    /// first source pair.
    fn on_start(&mut self, ctx: &mut EngineCtx<'_>) -> AppControl;

    /// Called for window events the runtime does not consume itself.
    fn on_window_event(&mut self, ctx: &mut EngineCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called after every frame callback, drawn or skipped.
    fn on_frame(&mut self, ctx: &mut EngineCtx<'_>, outcome: FrameOutcome) -> AppControl {
        let _ = (ctx, outcome);
        AppControl::Continue
    }
}
