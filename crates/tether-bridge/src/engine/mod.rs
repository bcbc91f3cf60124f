//! Engine-facing contract.
//!
//! The bridge never renders anything itself. It only decides when the engine
//! is created, updated and destroyed, and with which surface arguments.

mod native;

pub use native::{
    CreateFn, CreateSizedFn, CreateWithAssetsFn, DestroyFn, NativeCreate, NativeEngine, UpdateFn,
};

use crate::surface::{CreateArgs, HandshakeMode};

/// Capability interface implemented by rendering engines.
///
/// Calls are fire-and-forget: nothing is returned and engine panics are not
/// caught. The lifecycle guarantees `create` runs once before any `update`,
/// and `destroy` runs once after the last `update`.
pub trait Engine: Send {
    /// Handshake mode the engine's create entry point requires, if it is
    /// fixed. `None` lets the host configuration decide.
    fn handshake_mode(&self) -> Option<HandshakeMode> {
        None
    }

    /// Called once on the render thread after the surface exists.
    fn create(&mut self, args: CreateArgs);

    /// Called once per draw tick while running.
    fn update(&mut self);

    /// Called once on teardown, from whichever thread delivers it.
    fn destroy(&mut self);
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn handshake_mode(&self) -> Option<HandshakeMode> {
        (**self).handshake_mode()
    }

    fn create(&mut self, args: CreateArgs) {
        (**self).create(args)
    }

    fn update(&mut self) {
        (**self).update()
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}
