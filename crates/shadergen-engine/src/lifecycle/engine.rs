use crate::backend::{ContextVersion, GraphicsBackend};
use crate::error::EngineResult;
use crate::geometry::GeometryBuffer;
use crate::schedule::{FrameOutcome, FrameRequester, FrameToken, LoopState};
use crate::session::{FrameContext, RenderSession, SurfaceSize};
use crate::shader::{bind_attribute, compile_stage, link_program, resolve_attribute};
use crate::source::{ShaderSourcePair, StageKind};

use super::{EngineConfig, StatusMessage};

const LEGACY_CONTEXT_WARNING: &str = "modern OpenGL context not supported, falling back to a \
     legacy context; shaders are limited to GLSL ES 1.00 / GLSL 1.20 features";

/// Owns the backend and the (at most one) live [`RenderSession`].
pub struct ShaderEngine<B: GraphicsBackend> {
    backend: B,
    config: EngineConfig,
    session: Option<RenderSession<B>>,
    status: Option<StatusMessage>,
    teardowns: u64,
}

impl<B: GraphicsBackend> ShaderEngine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        log::info!("shader engine ready ({} context)", backend.context_version());
        Self {
            backend,
            config,
            session: None,
            status: None,
            teardowns: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context_version(&self) -> ContextVersion {
        self.backend.context_version()
    }

    pub fn session(&self) -> Option<&RenderSession<B>> {
        self.session.as_ref()
    }

    /// State of the live session's loop, `None` without a session.
    pub fn loop_state(&self) -> Option<LoopState> {
        self.session.as_ref().map(RenderSession::loop_state)
    }

    /// Number of sessions released so far.
    pub fn teardown_count(&self) -> u64 {
        self.teardowns
    }

    /// Current status line, if any.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Replaces whatever is rendering with a session built from `pair`.
    ///
    /// The previous session (if any) is always torn down first, even when the
    /// new pair turns out not to compile. On failure nothing is left allocated
    /// and the error is also recorded as the status line.
    pub fn submit<R: FrameRequester + ?Sized>(
        &mut self,
        pair: &ShaderSourcePair,
        size: SurfaceSize,
        requester: &mut R,
    ) -> EngineResult<()> {
        self.teardown(requester);
        self.status = None;

        if self.backend.context_version() == ContextVersion::Legacy {
            self.status = Some(StatusMessage::warning(LEGACY_CONTEXT_WARNING));
        }

        match self.build(pair, size) {
            Ok(mut session) => {
                if let Some(warning) = session.attribute_resolution().warning() {
                    log::warn!("{warning}");
                    self.status = Some(StatusMessage::warning(warning));
                }

                session.render_loop_mut().start(requester);
                log::info!(
                    "render session {} running: attribute '{}' at location {}, {}x{}",
                    session.generation(),
                    session.attribute().name,
                    session.attribute().location,
                    size.width,
                    size.height,
                );
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                log::error!("shader pipeline build failed for generation {}: {err}", pair.generation());
                self.status = Some(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Frame callback for `token`.
    ///
    /// Renders only if `token` is the live session's outstanding frame; any
    /// other callback (cancelled, stale, or arriving after teardown) is skipped.
    pub fn frame<R: FrameRequester + ?Sized>(
        &mut self,
        token: FrameToken,
        requester: &mut R,
    ) -> FrameOutcome {
        let Some(session) = self.session.as_mut() else {
            log::debug!("skipped frame {}: no live session", token.id());
            return FrameOutcome::Skipped;
        };

        let Some(time) = session.render_loop_mut().begin_frame(token) else {
            return FrameOutcome::Skipped;
        };

        let frame = FrameContext { time, size: session.size() };
        session.draw(&self.backend, &frame);
        session.render_loop_mut().finish_frame(requester);

        FrameOutcome::Drawn { elapsed: time.elapsed }
    }

    /// Tears the live session down. A second call is a no-op.
    ///
    /// Returns whether a session was released.
    pub fn shutdown<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) -> bool {
        let released = self.teardown(requester);
        if released {
            log::info!("shader engine shut down");
        }
        released
    }

    fn teardown<R: FrameRequester + ?Sized>(&mut self, requester: &mut R) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        let generation = session.generation();

        // Cancel before release: no callback may observe deleted objects.
        session.stop(requester);
        session.release(&self.backend);
        self.teardowns += 1;

        log::info!("render session {generation} torn down");
        true
    }

    fn build(&self, pair: &ShaderSourcePair, size: SurfaceSize) -> EngineResult<RenderSession<B>> {
        let backend = &self.backend;

        let vertex = compile_stage(backend, StageKind::Vertex, pair.vertex())?;
        let fragment = match compile_stage(backend, StageKind::Fragment, pair.fragment()) {
            Ok(stage) => stage,
            Err(err) => {
                vertex.release(backend);
                return Err(err);
            }
        };

        let program = link_program(backend, vertex, fragment)?;

        let resolution = resolve_attribute(pair.vertex(), &self.config.fallback_attribute);
        let attribute = match bind_attribute(backend, &program, resolution.name()) {
            Ok(a) => a,
            Err(err) => {
                program.release(backend);
                return Err(err);
            }
        };

        let geometry = match GeometryBuffer::new(backend) {
            Ok(g) => g,
            Err(err) => {
                program.release(backend);
                return Err(err);
            }
        };

        Ok(RenderSession::new(
            backend,
            pair.generation(),
            program,
            resolution,
            attribute,
            geometry,
            size,
            self.config.clear_color,
        ))
    }
}

/// Requester used when the engine is dropped without an explicit shutdown.
///
/// The host's outstanding token can no longer be withdrawn at that point; it
/// will find no session and be skipped.
struct Detached;

impl FrameRequester for Detached {
    fn request_frame(&mut self) -> FrameToken {
        FrameToken::new(0)
    }

    fn cancel_frame(&mut self, _token: FrameToken) {}
}

impl<B: GraphicsBackend> Drop for ShaderEngine<B> {
    fn drop(&mut self) {
        if self.session.is_some() {
            log::warn!("shader engine dropped with a live session; releasing it");
            self.teardown(&mut Detached);
        }
    }
}
