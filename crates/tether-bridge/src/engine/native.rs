use std::ffi::c_void;

use crate::surface::{CreateArgs, HandshakeMode};

use super::Engine;

pub type CreateFn = unsafe extern "C" fn();
pub type CreateSizedFn = unsafe extern "C" fn(width: i32, height: i32);
pub type CreateWithAssetsFn = unsafe extern "C" fn(width: i32, height: i32, assets: *mut c_void);
pub type UpdateFn = unsafe extern "C" fn();
pub type DestroyFn = unsafe extern "C" fn();

/// The create entry point, in one of its supported arities.
#[derive(Debug, Copy, Clone)]
pub enum NativeCreate {
    Unsized(CreateFn),
    Sized(CreateSizedFn),
    WithAssets(CreateWithAssetsFn),
}

impl NativeCreate {
    /// Handshake configuration matching this arity.
    pub fn handshake_mode(&self) -> HandshakeMode {
        match self {
            NativeCreate::Unsized(_) => HandshakeMode::SelfSized,
            NativeCreate::Sized(_) => HandshakeMode::Sized,
            NativeCreate::WithAssets(_) => HandshakeMode::SizedWithAssets,
        }
    }
}

/// Engine implemented behind a C ABI.
///
/// Holds the three exported entry points of a native engine library.
#[derive(Debug, Copy, Clone)]
pub struct NativeEngine {
    create: NativeCreate,
    update: UpdateFn,
    destroy: DestroyFn,
}

impl NativeEngine {
    /// # Safety
    ///
    /// The function pointers must stay callable for as long as this value
    /// exists, and the engine behind them must tolerate being called from
    /// the render thread (create, update) and the UI thread (destroy).
    pub unsafe fn new(create: NativeCreate, update: UpdateFn, destroy: DestroyFn) -> Self {
        Self {
            create,
            update,
            destroy,
        }
    }
}

impl Engine for NativeEngine {
    fn handshake_mode(&self) -> Option<HandshakeMode> {
        Some(self.create.handshake_mode())
    }

    fn create(&mut self, args: CreateArgs) {
        let (width, height) = match args.size() {
            Some(size) => (size.width, size.height),
            None => (0, 0),
        };

        match self.create {
            NativeCreate::Unsized(f) => unsafe { f() },
            NativeCreate::Sized(f) => {
                if args.size().is_none() {
                    log::warn!("sized native create called without a surface size");
                }
                unsafe { f(width, height) }
            }
            NativeCreate::WithAssets(f) => {
                let assets = args
                    .assets()
                    .map_or(std::ptr::null_mut(), |a| a.as_raw());
                unsafe { f(width, height, assets) }
            }
        }
    }

    fn update(&mut self) {
        unsafe { (self.update)() }
    }

    fn destroy(&mut self) {
        unsafe { (self.destroy)() }
    }
}
