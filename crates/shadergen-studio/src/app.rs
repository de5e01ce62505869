use std::fmt;
use std::path::PathBuf;

use shadergen_engine::core::{App, AppControl, EngineCtx};
use shadergen_engine::{EngineResult, ShaderSourcePair};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::demo;

/// Where the studio gets its shader text from.
#[derive(Debug, Clone)]
pub enum ShaderOrigin {
    Files { vertex: PathBuf, fragment: PathBuf },
    Demo,
}

impl ShaderOrigin {
    /// Reads a fresh pair. Every call yields a new generation, even when the
    /// text did not change.
    fn load(&self) -> EngineResult<ShaderSourcePair> {
        match self {
            ShaderOrigin::Files { vertex, fragment } => ShaderSourcePair::from_files(vertex, fragment),
            ShaderOrigin::Demo => ShaderSourcePair::new(demo::VERTEX, demo::FRAGMENT),
        }
    }
}

impl fmt::Display for ShaderOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderOrigin::Files { vertex, fragment } => {
                write!(f, "{} + {}", vertex.display(), fragment.display())
            }
            ShaderOrigin::Demo => f.write_str("built-in demo"),
        }
    }
}

/// Host application: loads sources, reloads on `R`, exits on `Escape`.
pub struct StudioApp {
    origin: ShaderOrigin,
    title: String,
}

impl StudioApp {
    pub fn new(origin: ShaderOrigin, title: String) -> Self {
        Self { origin, title }
    }

    fn reload(&mut self, ctx: &mut EngineCtx<'_>) {
        let pair = match self.origin.load() {
            Ok(pair) => pair,
            Err(e) => {
                // Nothing was submitted; whatever is running keeps running.
                log::error!("{}", error_chain(&e));
                return;
            }
        };

        log::info!("submitting shader generation {}", pair.generation());
        // Failures are reported through the status line below.
        let _ = ctx.submit(&pair);
        self.report(ctx);
    }

    fn report(&self, ctx: &EngineCtx<'_>) {
        let label = match ctx.status() {
            Some(status) if status.is_error() => {
                log::error!("{status}");
                "error"
            }
            Some(status) => {
                log::warn!("{status}");
                "warning"
            }
            None => "running",
        };
        ctx.window()
            .set_title(&format!("{} [{label}, {} GL]", self.title, ctx.context_version()));
    }
}

impl App for StudioApp {
    fn on_start(&mut self, ctx: &mut EngineCtx<'_>) -> AppControl {
        self.reload(ctx);
        AppControl::Continue
    }

    fn on_window_event(&mut self, ctx: &mut EngineCtx<'_>, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => AppControl::Exit,
            PhysicalKey::Code(KeyCode::KeyR) => {
                self.reload(ctx);
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
