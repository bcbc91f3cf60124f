use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::coords::{SurfaceSize, Viewport};
use crate::engine::Engine;
use crate::surface::SurfaceHandshake;

use super::fault::{FaultPolicy, panic_message};
use super::gfx::GraphicsContext;
use super::state::{AtomicLifecycleState, LifecycleState};

/// Drives an engine through create, update and destroy.
///
/// Surface creation, geometry changes and draw ticks arrive on the render
/// thread; teardown may arrive on the UI thread. Every call that reaches the
/// engine does so under one lock, and the state is checked under that lock,
/// so teardown waits for an in-flight update and no update starts after it.
///
/// Signals that arrive in the wrong state are ignored rather than reported:
/// hosts legitimately repeat lifecycle callbacks.
///
/// A panic inside the engine is a fault, handled per `FaultPolicy`. A
/// faulted engine is never called again.
#[derive(Debug)]
pub struct RenderLifecycle<E> {
    state: AtomicLifecycleState,
    engine: Mutex<E>,
    handshake: SurfaceHandshake,
    frames: AtomicU64,
    on_fault: FaultPolicy,
    faulted: AtomicBool,
}

impl<E: Engine> RenderLifecycle<E> {
    /// Builds the lifecycle. An engine that declares its own handshake mode
    /// overrides the one `handshake` was built with.
    pub fn new(engine: E, handshake: SurfaceHandshake) -> Self {
        let handshake = match engine.handshake_mode() {
            Some(mode) if mode != handshake.mode() => {
                log::warn!(
                    "handshake configured as {:?} but the engine takes {mode:?}; using {mode:?}",
                    handshake.mode()
                );
                handshake.with_mode(mode)
            }
            _ => handshake,
        };

        Self {
            state: AtomicLifecycleState::new(),
            engine: Mutex::new(engine),
            handshake,
            frames: AtomicU64::new(0),
            on_fault: FaultPolicy::default(),
            faulted: AtomicBool::new(false),
        }
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.on_fault = policy;
        self
    }

    /// Current state. Lock-free; may be stale by the time it is used.
    pub fn state(&self) -> LifecycleState {
        self.state.load()
    }

    /// Handshake the window captures the surface into.
    pub fn handshake(&self) -> &SurfaceHandshake {
        &self.handshake
    }

    /// Number of updates delivered to the engine so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Whether an engine call panicked. Only observable under
    /// `FaultPolicy::Halt`.
    pub fn is_faulted(&self) -> bool {
        self.faulted.load(Ordering::Acquire)
    }

    /// Surface-creation callback (render thread).
    ///
    /// Delivers the handshake, applies the initial viewport when the size is
    /// known, then creates the engine. Returns true if the engine was created
    /// by this call.
    pub fn on_surface_created(&self, gfx: &mut dyn GraphicsContext) -> bool {
        let mut engine = self.engine.lock();

        let state = self.state.load();
        if state != LifecycleState::Uncreated {
            log::debug!("surface created while {state}; engine not re-created");
            return false;
        }

        let Some(args) = self.handshake.deliver() else {
            log::warn!("surface created before its size was captured; deferring engine create");
            return false;
        };

        if let Some(size) = args.size() {
            gfx.set_viewport(Viewport::full(size));
        }

        log::info!("creating engine ({args:?})");
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| engine.create(args))) {
            self.fault("create", payload);
            return false;
        }

        match self.state.transition(LifecycleState::Uncreated, LifecycleState::Running) {
            Ok(()) => true,
            Err(observed) => {
                // All writers hold the engine lock; this cannot race.
                log::error!("lifecycle moved to {observed} during engine create");
                false
            }
        }
    }

    /// Surface geometry change (render thread). Forwards the full-surface
    /// viewport to `gfx` while running.
    pub fn on_surface_changed(&self, gfx: &mut dyn GraphicsContext, size: SurfaceSize) {
        let state = self.state.load();
        if state != LifecycleState::Running {
            log::debug!("surface changed to {}x{} while {state}; ignored", size.width, size.height);
            return;
        }

        log::debug!("surface changed: {}x{}", size.width, size.height);
        gfx.set_viewport(Viewport::full(size));
    }

    /// Draw tick (render thread). Returns true if the engine was updated.
    pub fn on_draw_frame(&self) -> bool {
        let mut engine = self.engine.lock();

        if self.state.load() != LifecycleState::Running {
            log::trace!("draw tick outside running state; skipped");
            return false;
        }

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| engine.update())) {
            self.fault("update", payload);
            return false;
        }

        self.frames.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Window teardown (any thread). Destroys the engine on the first call
    /// only; waits for an in-flight update. Returns true if the engine was
    /// destroyed by this call.
    pub fn on_window_destroyed(&self) -> bool {
        let mut engine = self.engine.lock();

        match self.state.load() {
            LifecycleState::Running => {
                if let Err(observed) = self
                    .state
                    .transition(LifecycleState::Running, LifecycleState::Destroyed)
                {
                    log::error!("lifecycle moved to {observed} during teardown");
                    return false;
                }

                log::info!("destroying engine after {} frames", self.frames());
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| engine.destroy())) {
                    self.fault("destroy", payload);
                    return false;
                }
                true
            }
            LifecycleState::Uncreated => {
                // Nothing was created, so there is nothing to destroy; close
                // the door on a late surface-creation signal.
                let _ = self
                    .state
                    .transition(LifecycleState::Uncreated, LifecycleState::Destroyed);
                log::info!("window torn down before the engine was created");
                false
            }
            LifecycleState::Destroyed if self.is_faulted() => {
                log::info!("teardown after engine fault; destroy skipped");
                false
            }
            LifecycleState::Destroyed => {
                log::debug!("duplicate teardown ignored");
                false
            }
        }
    }

    /// Caller holds the engine lock.
    fn fault(&self, call: &str, payload: Box<dyn Any + Send>) {
        log::error!("engine panicked in {call}: {}", panic_message(payload.as_ref()));

        if self.on_fault == FaultPolicy::Abort {
            log::logger().flush();
            std::process::abort();
        }

        self.faulted.store(true, Ordering::Release);
        let from = self.state.load();
        if from != LifecycleState::Destroyed {
            let _ = self.state.transition(from, LifecycleState::Destroyed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::surface::{CreateArgs, HandshakeMode, SurfaceDescriptor};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(Option<SurfaceSize>),
        Update,
        Destroy,
    }

    /// Records calls and flags any out-of-order invocation.
    #[derive(Debug, Clone, Default)]
    struct RecordingEngine {
        calls: Arc<Mutex<Vec<Call>>>,
        violation: Arc<AtomicBool>,
    }

    impl RecordingEngine {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.lock().iter().filter(|c| pred(c)).count()
        }

        fn violated(&self) -> bool {
            self.violation.load(Ordering::SeqCst)
        }

        fn flag(&self) {
            self.violation.store(true, Ordering::SeqCst);
        }
    }

    impl Engine for RecordingEngine {
        fn create(&mut self, args: CreateArgs) {
            let mut calls = self.calls.lock();
            if !calls.is_empty() {
                self.flag();
            }
            calls.push(Call::Create(args.size()));
        }

        fn update(&mut self) {
            let mut calls = self.calls.lock();
            if !matches!(calls.first(), Some(Call::Create(_))) || calls.contains(&Call::Destroy) {
                self.flag();
            }
            calls.push(Call::Update);
        }

        fn destroy(&mut self) {
            let mut calls = self.calls.lock();
            if calls.contains(&Call::Destroy) {
                self.flag();
            }
            calls.push(Call::Destroy);
        }
    }

    fn sized_lifecycle(w: i32, h: i32) -> (RenderLifecycle<RecordingEngine>, RecordingEngine) {
        let engine = RecordingEngine::default();
        let lc = RenderLifecycle::new(engine.clone(), SurfaceHandshake::new(HandshakeMode::Sized));
        assert!(lc.handshake().capture(SurfaceDescriptor::new(SurfaceSize::new(w, h))));
        (lc, engine)
    }

    fn no_gfx() -> impl FnMut(Viewport) {
        |_| {}
    }

    #[test]
    fn create_then_update_with_viewport() {
        let (lc, engine) = sized_lifecycle(1080, 1920);
        let mut viewports: Vec<Viewport> = Vec::new();

        assert!(lc.on_surface_created(&mut |vp: Viewport| viewports.push(vp)));
        assert_eq!(lc.state(), LifecycleState::Running);
        assert!(lc.on_draw_frame());

        assert_eq!(viewports, vec![Viewport::new(0, 0, 1080, 1920)]);
        assert_eq!(
            engine.calls(),
            vec![Call::Create(Some(SurfaceSize::new(1080, 1920))), Call::Update]
        );
        assert_eq!(lc.frames(), 1);
    }

    #[test]
    fn duplicate_surface_created_creates_once() {
        let (lc, engine) = sized_lifecycle(10, 10);
        let mut gfx = no_gfx();

        assert!(lc.on_surface_created(&mut gfx));
        for _ in 0..5 {
            assert!(!lc.on_surface_created(&mut gfx));
        }
        assert_eq!(engine.count(|c| matches!(c, Call::Create(_))), 1);
    }

    #[test]
    fn update_before_create_is_noop() {
        let (lc, engine) = sized_lifecycle(10, 10);
        assert!(!lc.on_draw_frame());
        assert!(engine.calls().is_empty());
        assert_eq!(lc.frames(), 0);
    }

    #[test]
    fn double_destroy_destroys_once() {
        let (lc, engine) = sized_lifecycle(10, 10);
        lc.on_surface_created(&mut no_gfx());

        assert!(lc.on_window_destroyed());
        assert!(!lc.on_window_destroyed());
        assert_eq!(engine.count(|c| *c == Call::Destroy), 1);
        assert_eq!(lc.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn update_after_destroy_is_noop() {
        let (lc, engine) = sized_lifecycle(10, 10);
        lc.on_surface_created(&mut no_gfx());
        lc.on_window_destroyed();

        assert!(!lc.on_draw_frame());
        assert_eq!(engine.calls().last(), Some(&Call::Destroy));
        assert!(!engine.violated());
    }

    #[test]
    fn teardown_before_create_blocks_late_create() {
        let (lc, engine) = sized_lifecycle(10, 10);

        assert!(!lc.on_window_destroyed());
        assert_eq!(lc.state(), LifecycleState::Destroyed);
        assert!(!lc.on_surface_created(&mut no_gfx()));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn create_waits_for_capture() {
        let engine = RecordingEngine::default();
        let lc = RenderLifecycle::new(engine.clone(), SurfaceHandshake::new(HandshakeMode::Sized));

        assert!(!lc.on_surface_created(&mut no_gfx()));
        assert_eq!(lc.state(), LifecycleState::Uncreated);

        lc.handshake().capture(SurfaceDescriptor::new(SurfaceSize::new(4, 4)));
        assert!(lc.on_surface_created(&mut no_gfx()));
        assert_eq!(engine.calls(), vec![Call::Create(Some(SurfaceSize::new(4, 4)))]);
    }

    #[test]
    fn self_sized_creates_without_viewport() {
        let engine = RecordingEngine::default();
        let lc = RenderLifecycle::new(engine.clone(), SurfaceHandshake::new(HandshakeMode::SelfSized));
        let mut viewports: Vec<Viewport> = Vec::new();

        assert!(lc.on_surface_created(&mut |vp: Viewport| viewports.push(vp)));
        assert!(viewports.is_empty());
        assert_eq!(engine.calls(), vec![Call::Create(None)]);
    }

    #[test]
    fn surface_changed_forwards_viewport_only_while_running() {
        let (lc, engine) = sized_lifecycle(100, 100);
        let mut viewports: Vec<Viewport> = Vec::new();

        lc.on_surface_changed(&mut |vp: Viewport| viewports.push(vp), SurfaceSize::new(50, 50));
        assert!(viewports.is_empty());

        lc.on_surface_created(&mut no_gfx());
        lc.on_surface_changed(&mut |vp: Viewport| viewports.push(vp), SurfaceSize::new(1920, 1080));
        assert_eq!(viewports, vec![Viewport::new(0, 0, 1920, 1080)]);

        // Geometry changes never reach the engine.
        assert_eq!(engine.calls().len(), 1);
    }

    // Render thread ticks while the UI thread tears down; no update may land
    // after destroy and destroy must happen exactly once.
    #[test]
    fn concurrent_teardown_fences_updates() {
        for _ in 0..50 {
            let (lc, engine) = sized_lifecycle(8, 8);
            let lc = Arc::new(lc);

            std::thread::scope(|s| {
                let render = Arc::clone(&lc);
                s.spawn(move || {
                    render.on_surface_created(&mut no_gfx());
                    while render.state() != LifecycleState::Destroyed {
                        render.on_draw_frame();
                    }
                    for _ in 0..10 {
                        render.on_draw_frame();
                    }
                });

                for _ in 0..3 {
                    let ui = Arc::clone(&lc);
                    s.spawn(move || {
                        while ui.state() == LifecycleState::Uncreated {
                            std::thread::yield_now();
                        }
                        ui.on_window_destroyed();
                    });
                }
            });

            assert!(!engine.violated());
            assert_eq!(engine.count(|c| *c == Call::Destroy), 1);
            assert_eq!(engine.count(|c| matches!(c, Call::Create(_))), 1);
            assert_eq!(engine.calls().last(), Some(&Call::Destroy));
        }
    }

    /// Panics on the given update; counts destroy calls.
    struct FaultyEngine {
        panic_on: u64,
        updates: u64,
        destroys: Arc<AtomicU64>,
    }

    impl FaultyEngine {
        fn new(panic_on: u64) -> (Self, Arc<AtomicU64>) {
            let destroys = Arc::new(AtomicU64::new(0));
            let engine = Self {
                panic_on,
                updates: 0,
                destroys: Arc::clone(&destroys),
            };
            (engine, destroys)
        }
    }

    impl Engine for FaultyEngine {
        fn create(&mut self, _: CreateArgs) {}

        fn update(&mut self) {
            self.updates += 1;
            if self.updates == self.panic_on {
                panic!("engine fault on update {}", self.updates);
            }
        }

        fn destroy(&mut self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn halted_engine_is_never_called_again() {
        let (engine, destroys) = FaultyEngine::new(3);
        let lc = RenderLifecycle::new(engine, SurfaceHandshake::new(HandshakeMode::SelfSized))
            .with_fault_policy(FaultPolicy::Halt);
        assert!(lc.on_surface_created(&mut no_gfx()));

        assert!(lc.on_draw_frame());
        assert!(lc.on_draw_frame());
        assert!(!lc.on_draw_frame());

        assert!(lc.is_faulted());
        assert_eq!(lc.state(), LifecycleState::Destroyed);
        assert_eq!(lc.frames(), 2);

        assert!(!lc.on_draw_frame());
        assert!(!lc.on_window_destroyed());
        assert_eq!(destroys.load(Ordering::SeqCst), 0);
    }

    const ABORT_CHILD_ENV: &str = "TETHER_LIFECYCLE_ABORT_CHILD";

    // Re-runs this test in a child process, where the engine fault must take
    // the whole process down with SIGABRT.
    #[test]
    fn engine_fault_aborts_process_by_default() {
        if std::env::var_os(ABORT_CHILD_ENV).is_some() {
            let (engine, _) = FaultyEngine::new(1);
            let lc = RenderLifecycle::new(engine, SurfaceHandshake::new(HandshakeMode::SelfSized));
            lc.on_surface_created(&mut no_gfx());
            lc.on_draw_frame();
            return;
        }

        let status = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "lifecycle::machine::tests::engine_fault_aborts_process_by_default",
                "--test-threads=1",
            ])
            .env(ABORT_CHILD_ENV, "1")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();

        assert!(!status.success());
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            assert_eq!(status.signal(), Some(6), "expected SIGABRT, got {status:?}");
        }
    }

    mod native_sized {
        use std::sync::atomic::{AtomicI32, Ordering};

        pub static WIDTH: AtomicI32 = AtomicI32::new(-1);
        pub static HEIGHT: AtomicI32 = AtomicI32::new(-1);

        pub unsafe extern "C" fn create(w: i32, h: i32) {
            WIDTH.store(w, Ordering::SeqCst);
            HEIGHT.store(h, Ordering::SeqCst);
        }

        pub unsafe extern "C" fn noop() {}
    }

    #[test]
    fn native_arity_overrides_configured_handshake() {
        use crate::engine::{NativeCreate, NativeEngine};

        let engine = unsafe {
            NativeEngine::new(
                NativeCreate::Sized(native_sized::create),
                native_sized::noop,
                native_sized::noop,
            )
        };
        let lc = RenderLifecycle::new(engine, SurfaceHandshake::new(HandshakeMode::SelfSized));
        assert_eq!(lc.handshake().mode(), HandshakeMode::Sized);

        // No size captured yet: a sized engine must not be created with 0x0.
        assert!(!lc.on_surface_created(&mut no_gfx()));
        assert_eq!(native_sized::WIDTH.load(Ordering::SeqCst), -1);

        lc.handshake().capture(SurfaceDescriptor::new(SurfaceSize::new(720, 1280)));
        assert!(lc.on_surface_created(&mut no_gfx()));
        assert_eq!(native_sized::WIDTH.load(Ordering::SeqCst), 720);
        assert_eq!(native_sized::HEIGHT.load(Ordering::SeqCst), 1280);
    }

    #[test]
    fn override_keeps_captured_descriptor() {
        let hs = SurfaceHandshake::new(HandshakeMode::SelfSized);
        hs.capture(SurfaceDescriptor::new(SurfaceSize::new(3, 4)));

        let hs = hs.with_mode(HandshakeMode::Sized);
        assert!(matches!(hs.deliver(), Some(CreateArgs::Sized(size)) if size == SurfaceSize::new(3, 4)));
    }
}
