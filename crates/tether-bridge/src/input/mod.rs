//! Touch input subsystem.
//!
//! Public API is platform-agnostic. The window runtime translates platform
//! events into `TouchEvent`s and applies them to a shared `TouchState`.

mod touch;
mod types;

pub mod platform;

pub use touch::{NO_CONTACT, TouchPoint, TouchSnapshot, TouchState};
pub use types::{TouchAction, TouchContact, TouchEvent};
