use winit::window::Window;

use crate::backend::{ContextVersion, GlowBackend};
use crate::device::GlDevice;
use crate::error::EngineResult;
use crate::lifecycle::{ShaderEngine, StatusMessage};
use crate::schedule::{FrameRequester, LoopState};
use crate::source::ShaderSourcePair;

/// Handles passed to every [`App`](super::App) callback.
///
/// Borrows the engine together with the window's frame requester, so a
/// submission can stop the old render loop and start the new one in one call.
pub struct EngineCtx<'a> {
    pub(crate) engine: &'a mut ShaderEngine<GlowBackend>,
    pub(crate) device: &'a GlDevice,
    pub(crate) requester: &'a mut dyn FrameRequester,
}

impl<'a> EngineCtx<'a> {
    /// Replaces the running shader with `pair`, sized to the current surface.
    pub fn submit(&mut self, pair: &ShaderSourcePair) -> EngineResult<()> {
        let size = self.device.size();
        self.engine.submit(pair, size, &mut *self.requester)
    }

    /// Stops rendering and releases the live session, if any.
    pub fn shutdown(&mut self) -> bool {
        self.engine.shutdown(&mut *self.requester)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.engine.status()
    }

    pub fn loop_state(&self) -> Option<LoopState> {
        self.engine.loop_state()
    }

    pub fn context_version(&self) -> ContextVersion {
        self.device.version()
    }

    pub fn window(&self) -> &Window {
        self.device.window()
    }
}
