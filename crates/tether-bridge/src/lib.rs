//! Tether bridge crate.
//!
//! Sits between a platform window (UI thread) and a native rendering engine
//! (render thread). Owns the engine lifecycle, the one-shot surface handshake
//! and the cross-thread touch state.

pub mod coords;
pub mod engine;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod surface;
pub mod time;
pub mod window;

pub mod logging;
