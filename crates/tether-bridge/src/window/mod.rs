//! Window runtime.
//!
//! Owns the `winit` event loop and window (UI thread) and wires them to the
//! bridge: surface capture, geometry changes, touch input and teardown.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
