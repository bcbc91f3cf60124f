//! Surface geometry shared by the lifecycle and the window runtime.
//!
//! All values are physical pixels with the origin at the top-left corner of
//! the drawable surface.

mod viewport;

pub use viewport::{SurfaceSize, Viewport};
