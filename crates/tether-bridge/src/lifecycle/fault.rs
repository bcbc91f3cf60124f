use std::any::Any;

/// What the lifecycle does when an engine call panics.
///
/// Either way the engine is never called again, destroy included: its state
/// is unknown after unwinding partway through a call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FaultPolicy {
    /// Abort the whole process.
    #[default]
    Abort,
    /// Mark the lifecycle destroyed and stop driving the engine. Meant for
    /// hosts that embed several bridges and for tests.
    Halt,
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
