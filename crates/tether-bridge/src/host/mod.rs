//! Threading glue between a window and the render lifecycle.
//!
//! `Bridge` lives on the UI thread; `RenderThread` owns the graphics context
//! and runs surface callbacks and draw ticks.

mod bridge;
mod config;
mod render_thread;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use render_thread::{RenderSignal, RenderThread};
