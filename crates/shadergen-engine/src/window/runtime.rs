use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::backend::GlowBackend;
use crate::core::{App, AppControl, EngineCtx};
use crate::device::{GlDevice, GlInit};
use crate::lifecycle::{EngineConfig, ShaderEngine};
use crate::schedule::{FrameOutcome, FrameRequester, FrameToken};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "shadergen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, builds the GL device and drives `app` until exit.
    pub fn run<A>(config: RuntimeConfig, gl_init: GlInit, engine_config: EngineConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gl_init, engine_config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.into_result()
    }
}

// ── frame requests ────────────────────────────────────────────────────────

/// The single outstanding redraw the render loop asked for.
///
/// A redraw delivered while this is `None` was either cancelled or issued by
/// the platform on its own (expose, resize); it draws nothing.
#[derive(Debug, Default)]
struct FrameTokens {
    next_id: u64,
    outstanding: Option<FrameToken>,
}

impl FrameTokens {
    fn issue(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken::new(self.next_id);
        self.outstanding = Some(token);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        if self.outstanding == Some(token) {
            self.outstanding = None;
        }
    }

    /// Consumes the outstanding token for a delivered redraw.
    fn deliver(&mut self) -> Option<FrameToken> {
        self.outstanding.take()
    }
}

/// [`FrameRequester`] over `Window::request_redraw`.
struct RedrawRequester<'a> {
    tokens: &'a mut FrameTokens,
    window: &'a Window,
}

impl FrameRequester for RedrawRequester<'_> {
    fn request_frame(&mut self) -> FrameToken {
        let token = self.tokens.issue();
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        // The OS redraw may still arrive; without a token it is ignored.
        self.tokens.cancel(token);
    }
}

// ── window state ──────────────────────────────────────────────────────────

/// Field order is drop order: GL objects die before the context that owns them.
struct WindowEntry {
    engine: ShaderEngine<GlowBackend>,
    tokens: FrameTokens,
    device: GlDevice,
}

impl WindowEntry {
    /// Splits the entry into the borrows an app callback needs.
    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut EngineCtx<'_>) -> R) -> R {
        let mut requester = RedrawRequester {
            tokens: &mut self.tokens,
            window: self.device.window(),
        };
        let mut ctx = EngineCtx {
            engine: &mut self.engine,
            device: &self.device,
            requester: &mut requester,
        };
        f(&mut ctx)
    }

    fn shutdown(&mut self) {
        self.with_ctx(|ctx| ctx.shutdown());
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gl_init: GlInit,
    engine_config: EngineConfig,
    app: A,

    window: Option<WindowEntry>,
    window_id: Option<WindowId>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gl_init: GlInit, engine_config: EngineConfig, app: A) -> Self {
        Self {
            config,
            gl_init,
            engine_config,
            app,
            window: None,
            window_id: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        if let Some(entry) = self.window.as_mut() {
            entry.shutdown();
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let (device, backend) = GlDevice::new(event_loop, attrs, &self.gl_init)
            .context("GL initialization failed for window")?;

        self.window_id = Some(device.window().id());
        self.window = Some(WindowEntry {
            engine: ShaderEngine::new(backend, self.engine_config.clone()),
            tokens: FrameTokens::default(),
            device,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        let Some(token) = entry.tokens.deliver() else {
            log::trace!("redraw without an outstanding frame request");
            return;
        };

        let outcome = entry.with_ctx(|ctx| ctx.engine.frame(token, &mut *ctx.requester));

        if matches!(outcome, FrameOutcome::Drawn { .. }) {
            if let Err(e) = entry.device.present() {
                self.fail(event_loop, e);
                return;
            }
        }

        let app = &mut self.app;
        if entry.with_ctx(|ctx| app.on_frame(ctx, outcome)) == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        let app = &mut self.app;
        let control = match self.window.as_mut() {
            Some(entry) => entry.with_ctx(|ctx| app.on_start(ctx)),
            None => AppControl::Exit,
        };
        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        // Redraws are requested by the render loop itself, one frame at a time.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested || self.window_id != Some(window_id) {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.request_exit(event_loop);
                self.window = None;
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.device.resize(*new_size);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.device.window().inner_size();
                    entry.device.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {
                let app = &mut self.app;
                let control = match self.window.as_mut() {
                    Some(entry) => entry.with_ctx(|ctx| app.on_window_event(ctx, &event)),
                    None => AppControl::Continue,
                };
                if control == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut entry) = self.window.take() {
            entry.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_outstanding() {
        let mut tokens = FrameTokens::default();
        let first = tokens.issue();
        let second = tokens.issue();
        assert_ne!(first, second);

        tokens.cancel(first);
        assert_eq!(tokens.deliver(), Some(second));
        assert_eq!(tokens.deliver(), None);
    }

    #[test]
    fn cancelled_redraw_delivers_nothing() {
        let mut tokens = FrameTokens::default();
        let token = tokens.issue();
        tokens.cancel(token);
        assert_eq!(tokens.deliver(), None);
    }
}
