use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Engine lifecycle state.
///
/// Forward only: `Uncreated -> Running -> Destroyed`, plus
/// `Uncreated -> Destroyed` when the window goes away before the surface was
/// ever created. Nothing leaves `Destroyed`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    Uncreated = 0,
    Running = 1,
    Destroyed = 2,
}

impl LifecycleState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LifecycleState::Uncreated,
            1 => LifecycleState::Running,
            _ => LifecycleState::Destroyed,
        }
    }

    /// Whether `self -> to` is a legal transition.
    pub fn can_transition(self, to: LifecycleState) -> bool {
        matches!(
            (self, to),
            (LifecycleState::Uncreated, LifecycleState::Running)
                | (LifecycleState::Uncreated, LifecycleState::Destroyed)
                | (LifecycleState::Running, LifecycleState::Destroyed)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Uncreated => "uncreated",
            LifecycleState::Running => "running",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(s)
    }
}

/// `LifecycleState` stored in an atomic, changed only by compare-and-set.
#[derive(Debug)]
pub(crate) struct AtomicLifecycleState(AtomicU8);

impl AtomicLifecycleState {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(LifecycleState::Uncreated as u8))
    }

    pub(crate) fn load(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves `from -> to` if the current state is `from`.
    ///
    /// Returns the observed state on failure.
    pub(crate) fn transition(
        &self,
        from: LifecycleState,
        to: LifecycleState,
    ) -> Result<(), LifecycleState> {
        debug_assert!(from.can_transition(to), "illegal transition {from} -> {to}");

        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(LifecycleState::from_u8)
    }
}
