mod app;
mod demo;

use std::path::PathBuf;

use clap::Parser;
use shadergen_engine::EngineConfig;
use shadergen_engine::device::GlInit;
use shadergen_engine::logging::{init_logging, LoggingConfig};
use shadergen_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use app::{ShaderOrigin, StudioApp};

#[derive(Parser, Debug)]
#[command(name = "shadergen-studio", version)]
struct Cli {
    /// Vertex shader file (GLSL). Requires --fragment.
    #[arg(long, requires = "fragment")]
    vertex: Option<PathBuf>,

    /// Fragment shader file (GLSL). Requires --vertex.
    #[arg(long, requires = "vertex")]
    fragment: Option<PathBuf>,

    /// Window title.
    #[arg(long, default_value = "shadergen")]
    title: String,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 960.0)]
    width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 540.0)]
    height: f64,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,

    /// Skip the modern context tier and run on GLES 2.0 / GL 2.1.
    #[arg(long, default_value_t = false)]
    legacy: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let origin = match (cli.vertex, cli.fragment) {
        (Some(vertex), Some(fragment)) => ShaderOrigin::Files { vertex, fragment },
        _ => ShaderOrigin::Demo,
    };
    log::info!("shader source: {origin}");

    let runtime = RuntimeConfig {
        title: cli.title.clone(),
        initial_size: LogicalSize::new(cli.width, cli.height),
    };
    let gl_init = GlInit {
        allow_modern: !cli.legacy,
        ..GlInit::default()
    };

    Runtime::run(runtime, gl_init, EngineConfig::default(), StudioApp::new(origin, cli.title))
}
