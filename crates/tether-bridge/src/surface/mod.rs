//! Surface handshake.
//!
//! The window captures the drawable size (and optionally an asset handle)
//! once; the render thread delivers it to the engine's create entry point
//! exactly once.

mod descriptor;
mod handshake;

pub use descriptor::{AssetContext, SurfaceDescriptor};
pub use handshake::{CreateArgs, HandshakeMode, SurfaceHandshake};
