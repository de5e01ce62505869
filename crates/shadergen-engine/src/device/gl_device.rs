use std::num::NonZeroU32;

use anyhow::{anyhow, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{NotCurrentContext, PossiblyCurrentContext};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::backend::{ContextVersion, GlowBackend};
use crate::error::EngineResult;
use crate::session::SurfaceSize;

use super::ladder::walk_ladder;
use super::{context_ladder, ContextRequest, GlInit};

/// Owns the window, its GL surface and the current GL context.
///
/// Field order is drop order: the surface goes before the context, and both
/// before the window they were created for.
pub struct GlDevice {
    /// Window surface (default framebuffer).
    surface: Surface<WindowSurface>,

    /// Context, current on the thread that created the device.
    context: PossiblyCurrentContext,

    /// Tier of the context that was actually created.
    version: ContextVersion,

    /// Current drawable size in physical pixels.
    size: SurfaceSize,

    window: Window,
}

impl GlDevice {
    /// Creates a window plus a current GL context, and loads a backend for it.
    ///
    /// The returned backend must be dropped before the device.
    pub fn new(
        event_loop: &ActiveEventLoop,
        window_attributes: WindowAttributes,
        init: &GlInit,
    ) -> Result<(Self, GlowBackend)> {
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes.clone()))
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow!("failed to create GL display: {e}"))?;

        let window = match window {
            Some(w) => w,
            None => glutin_winit::finalize_window(event_loop, window_attributes, &config)
                .context("failed to create window for GL config")?,
        };

        let raw_window = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();

        let display = config.display();
        let ladder = context_ladder(init);
        let (not_current, request) = create_context(&display, &config, Some(raw_window), &ladder)?;

        let physical = window.inner_size();
        let size = SurfaceSize::new(physical.width, physical.height);
        anyhow::ensure!(size.is_valid(), "window has zero size");

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("failed to describe window surface")?;
        // SAFETY: the window outlives the surface (see field order).
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create GL window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if init.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("failed to set swap interval: {e}");
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };

        log::info!(
            "GL context ready: {request} ({} tier), {}x{}",
            request.tier,
            size.width,
            size.height
        );
        if request.tier == ContextVersion::Legacy {
            log::warn!("modern OpenGL context unavailable, running on a legacy context");
        }

        let device = Self {
            surface,
            context,
            version: request.tier,
            size,
            window,
        };
        Ok((device, GlowBackend::new(gl, request.tier)))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn version(&self) -> ContextVersion {
        self.version
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Resizes the window surface. Zero-sized requests (minimized) are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let size = SurfaceSize::new(new_size.width, new_size.height);
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        self.surface.resize(&self.context, w, h);
        self.size = size;
    }

    /// Presents the back buffer.
    pub fn present(&self) -> Result<()> {
        self.window.pre_present_notify();
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap GL buffers")
    }
}

/// Prefers the config with the fewest samples; MSAA is wasted on a fullscreen quad.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() < best.num_samples() { c } else { best })
        // The picker cannot fail; glutin returns an error instead of calling
        // it when the template matches no config.
        .expect("glutin only calls the config picker with at least one config")
}

/// Walks `ladder` and returns the first context the display accepts.
fn create_context(
    display: &Display,
    config: &Config,
    raw_window: Option<raw_window_handle::RawWindowHandle>,
    ladder: &[ContextRequest],
) -> EngineResult<(NotCurrentContext, ContextRequest)> {
    walk_ladder(ladder, |request| {
        // SAFETY: `raw_window` belongs to a live window.
        unsafe { display.create_context(config, &request.attributes(raw_window)) }
    })
}
