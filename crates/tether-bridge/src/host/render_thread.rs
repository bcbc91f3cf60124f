use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, select};

use crate::coords::SurfaceSize;
use crate::engine::Engine;
use crate::lifecycle::{GraphicsContext, LifecycleState, RenderLifecycle};

/// Signals the UI thread forwards to the render thread.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderSignal {
    SurfaceCreated,
    SurfaceChanged(SurfaceSize),
    Stop,
}

/// Render thread owning the graphics context and the draw loop.
///
/// Surface signals are processed in order on this thread; draw ticks fire at
/// `frame_interval`. The loop ends on `Stop`, when every sender is gone, or
/// on the first tick after the engine was destroyed or halted by a fault.
#[derive(Debug)]
pub struct RenderThread {
    tx: Sender<RenderSignal>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn<E, G>(
        lifecycle: Arc<RenderLifecycle<E>>,
        gfx: G,
        frame_interval: Duration,
    ) -> Result<Self>
    where
        E: Engine + 'static,
        G: GraphicsContext + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::Builder::new()
            .name("tether-render".to_string())
            .spawn(move || run(&lifecycle, gfx, &rx, frame_interval))
            .context("failed to spawn render thread")?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, signal: RenderSignal) {
        if self.tx.send(signal).is_err() {
            log::debug!("render thread already exited; dropped {signal:?}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stops the loop and waits for the thread to exit.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.send(RenderSignal::Stop);
        if handle.join().is_err() {
            // Engine panics are handled by the lifecycle; this is the
            // graphics context.
            log::error!("render thread panicked outside the engine");
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<E, G>(
    lifecycle: &RenderLifecycle<E>,
    mut gfx: G,
    rx: &Receiver<RenderSignal>,
    frame_interval: Duration,
) where
    E: Engine,
    G: GraphicsContext,
{
    log::debug!("render thread started ({frame_interval:?} per frame)");
    let ticker = crossbeam_channel::tick(frame_interval);

    loop {
        select! {
            recv(rx) -> signal => match signal {
                Ok(RenderSignal::SurfaceCreated) => {
                    lifecycle.on_surface_created(&mut gfx);
                }
                Ok(RenderSignal::SurfaceChanged(size)) => {
                    lifecycle.on_surface_changed(&mut gfx, size);
                }
                Ok(RenderSignal::Stop) | Err(_) => break,
            },
            recv(ticker) -> _ => {
                if lifecycle.state() == LifecycleState::Destroyed {
                    break;
                }
                lifecycle.on_draw_frame();
            }
        }
    }

    log::debug!("render thread exiting after {} frames", lifecycle.frames());
}
