//! Frame timing for engines.
//!
//! The bridge calls `update` without arguments; engines that simulate over
//! time keep one `FrameClock` and tick it once per update.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
