use std::sync::Arc;

use anyhow::Result;

use crate::coords::SurfaceSize;
use crate::engine::Engine;
use crate::input::{TouchEvent, TouchState};
use crate::lifecycle::{GraphicsContext, LifecycleState, RenderLifecycle};
use crate::surface::{SurfaceDescriptor, SurfaceHandshake};

use super::config::BridgeConfig;
use super::render_thread::{RenderSignal, RenderThread};

/// UI-thread handle tying one window to one engine.
///
/// Owns the window's touch state and the lifecycle, and starts the render
/// thread once the surface is attached. Every method is meant to be called
/// from the thread that owns the window.
pub struct Bridge<E: Engine + 'static> {
    config: BridgeConfig,
    touch: Arc<TouchState>,
    lifecycle: Arc<RenderLifecycle<E>>,
    render: Option<RenderThread>,
}

impl<E: Engine + 'static> Bridge<E> {
    /// Builds the bridge. `make_engine` receives the touch state the engine
    /// should read from during its updates.
    pub fn new<F>(config: BridgeConfig, make_engine: F) -> Self
    where
        F: FnOnce(Arc<TouchState>) -> E,
    {
        let touch = Arc::new(TouchState::new());
        let engine = make_engine(Arc::clone(&touch));
        let lifecycle = Arc::new(
            RenderLifecycle::new(engine, SurfaceHandshake::new(config.handshake))
                .with_fault_policy(config.on_fault),
        );

        Self {
            config,
            touch,
            lifecycle,
            render: None,
        }
    }

    pub fn touch(&self) -> &Arc<TouchState> {
        &self.touch
    }

    pub fn lifecycle(&self) -> &Arc<RenderLifecycle<E>> {
        &self.lifecycle
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Records the surface description. Must precede `attach` in sized
    /// configurations.
    pub fn capture_surface(&self, descriptor: SurfaceDescriptor) -> bool {
        self.lifecycle.handshake().capture(descriptor)
    }

    /// Attaches the render surface: starts the render thread with `gfx` and
    /// signals surface creation. Once the thread runs, further attaches only
    /// repeat the signal and `gfx` is dropped.
    pub fn attach<G>(&mut self, gfx: G) -> Result<()>
    where
        G: GraphicsContext + Send + 'static,
    {
        if self.lifecycle.state() == LifecycleState::Destroyed {
            log::debug!("attach after teardown ignored");
            return Ok(());
        }

        if self.render.is_none() {
            let render = RenderThread::spawn(
                Arc::clone(&self.lifecycle),
                gfx,
                self.config.frame_interval,
            )?;
            self.render = Some(render);
        }

        self.surface_created();
        Ok(())
    }

    /// Repeats the surface-creation signal (e.g. on resume). The lifecycle
    /// creates the engine at most once, so this is safe to over-deliver.
    pub fn surface_created(&self) {
        if let Some(render) = &self.render {
            render.send(RenderSignal::SurfaceCreated);
        }
    }

    pub fn surface_changed(&self, size: SurfaceSize) {
        if let Some(render) = &self.render {
            render.send(RenderSignal::SurfaceChanged(size));
        }
    }

    pub fn on_touch(&self, event: &TouchEvent) {
        self.touch.apply(event);
    }

    /// Window teardown. Destroys the engine on this thread, after any
    /// in-flight update, then stops the render thread. Idempotent.
    pub fn teardown(&mut self) {
        self.lifecycle.on_window_destroyed();

        if let Some(mut render) = self.render.take() {
            render.stop();
        }
    }
}

impl<E: Engine + 'static> Drop for Bridge<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
