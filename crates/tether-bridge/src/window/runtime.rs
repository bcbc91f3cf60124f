use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::SurfaceSize;
use crate::engine::Engine;
use crate::host::{Bridge, BridgeConfig};
use crate::input::TouchState;
use crate::input::platform::ContactTracker;
use crate::lifecycle::GraphicsContext;
use crate::surface::{AssetContext, HandshakeMode, SurfaceDescriptor};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub bridge: BridgeConfig,

    /// Drive a single touch contact with the left mouse button.
    pub mouse_as_touch: bool,

    /// Directory lent to the engine as its asset context when the handshake
    /// passes assets.
    pub assets_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tether".to_string(),
            initial_size: LogicalSize::new(720.0, 1280.0),
            bridge: BridgeConfig::default(),
            mouse_as_touch: true,
            assets_dir: None,
        }
    }
}

/// Entry point for the runtime.
///
/// Runs the winit event loop on the calling thread, which becomes the UI
/// thread. The engine runs on a render thread started when the window's
/// surface is first available.
pub struct Runtime;

impl Runtime {
    pub fn run<E, F, G>(config: RuntimeConfig, make_engine: F, gfx: G) -> Result<()>
    where
        E: Engine + 'static,
        F: FnOnce(Arc<TouchState>) -> E,
        G: GraphicsContext + Send + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, make_engine, gfx);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState<E, G>
where
    E: Engine + 'static,
{
    config: RuntimeConfig,
    bridge: Bridge<E>,
    gfx: Option<G>,
    tracker: ContactTracker,

    window: Option<Window>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<E, G> AppState<E, G>
where
    E: Engine + 'static,
    G: GraphicsContext + Send + 'static,
{
    fn new<F>(config: RuntimeConfig, make_engine: F, gfx: G) -> Self
    where
        F: FnOnce(Arc<TouchState>) -> E,
    {
        let bridge = Bridge::new(config.bridge.clone(), make_engine);
        let tracker = ContactTracker::new(config.mouse_as_touch);

        Self {
            config,
            bridge,
            gfx: Some(gfx),
            tracker,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.teardown(event_loop);
    }

    /// Tears the engine down before the window goes away, then exits.
    fn teardown(&mut self, event_loop: &ActiveEventLoop) {
        self.bridge.teardown();
        self.window = None;
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let descriptor = self.describe_surface(window.inner_size());
        self.bridge.capture_surface(descriptor);
        self.window = Some(window);
        Ok(())
    }

    fn describe_surface(&self, size: PhysicalSize<u32>) -> SurfaceDescriptor {
        let descriptor = SurfaceDescriptor::new(to_surface_size(size));

        match (self.bridge.lifecycle().handshake().mode(), &self.config.assets_dir) {
            (HandshakeMode::SizedWithAssets, Some(dir)) => {
                descriptor.with_assets(AssetContext::from_dir(dir))
            }
            _ => descriptor,
        }
    }

    fn attach_surface(&mut self) -> Result<()> {
        match self.gfx.take() {
            Some(gfx) => self.bridge.attach(gfx),
            None => {
                self.bridge.surface_created();
                Ok(())
            }
        }
    }
}

impl<E, G> ApplicationHandler for AppState<E, G>
where
    E: Engine + 'static,
    G: GraphicsContext + Send + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none()
            && let Err(e) = self.create_window(event_loop)
        {
            self.fail(event_loop, e.context("failed to create initial window"));
            return;
        }

        if let Err(e) = self.attach_surface() {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Frames are paced by the render thread; the UI thread only waits
        // for input and lifecycle events.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        if let Some(touch) = self.tracker.translate(&event) {
            self.bridge.on_touch(&touch);
        }

        match event {
            WindowEvent::Resized(size) => {
                self.bridge.surface_changed(to_surface_size(size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.bridge.surface_changed(to_surface_size(size));
                }
            }

            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("window closing");
                self.teardown(event_loop);
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Covers exits that bypassed CloseRequested; no-op otherwise.
        self.bridge.teardown();
    }
}

fn to_surface_size(size: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(
        i32::try_from(size.width).unwrap_or(i32::MAX),
        i32::try_from(size.height).unwrap_or(i32::MAX),
    )
}
