use std::sync::Arc;

use tether_bridge::coords::{SurfaceSize, Viewport};
use tether_bridge::engine::Engine;
use tether_bridge::input::TouchState;
use tether_bridge::lifecycle::GraphicsContext;
use tether_bridge::surface::CreateArgs;
use tether_bridge::time::FrameClock;

/// Asset the demo tries to load when it is handed an asset context.
const SPLASH_ASSET: &str = "splash.txt";

/// Radians per second while a finger is down.
const SPIN_RATE: f32 = 1.0;

const REPORT_EVERY: u64 = 120;

/// Stand-in engine: spins a virtual quad while the screen is touched and
/// reports what it sees through the log.
pub struct DemoEngine {
    touch: Arc<TouchState>,
    clock: FrameClock,
    size: Option<SurfaceSize>,
    angle: f32,
    updates: u64,
}

impl DemoEngine {
    pub fn new(touch: Arc<TouchState>) -> Self {
        Self {
            touch,
            clock: FrameClock::new(),
            size: None,
            angle: 0.0,
            updates: 0,
        }
    }
}

impl Engine for DemoEngine {
    fn create(&mut self, args: CreateArgs) {
        self.size = args.size();

        if let Some(assets) = args.assets() {
            match assets.read(SPLASH_ASSET) {
                Ok(bytes) => log::info!("demo: loaded {SPLASH_ASSET} ({} bytes)", bytes.len()),
                Err(e) => log::warn!("demo: {e:#}"),
            }
        }

        self.clock.restart();
        log::info!("demo: created (surface {:?})", self.size);
    }

    fn update(&mut self) {
        let ft = self.clock.tick();
        let snap = self.touch.snapshot();

        if snap.has_touch() {
            self.angle = (self.angle + ft.dt * SPIN_RATE) % std::f32::consts::TAU;
        }

        self.updates += 1;
        if self.updates % REPORT_EVERY == 0 {
            let shown = match self.size {
                Some(size) => snap.normalized(size),
                None => snap,
            };
            log::info!(
                "demo: frame {} angle {:.2} primary {:?} secondary {:?}",
                ft.frame_index,
                self.angle,
                shown.primary,
                shown.multi_touch()
            );
        }
    }

    fn destroy(&mut self) {
        log::info!("demo: destroyed after {} updates", self.updates);
    }
}

/// Graphics context that only reports viewport changes.
#[derive(Debug, Default)]
pub struct LogViewport {
    current: Option<Viewport>,
}

impl GraphicsContext for LogViewport {
    fn set_viewport(&mut self, viewport: Viewport) {
        if self.current != Some(viewport) {
            log::info!(
                "viewport ({}, {}, {}, {})",
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height
            );
            self.current = Some(viewport);
        }
    }
}
