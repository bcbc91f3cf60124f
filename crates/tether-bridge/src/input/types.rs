/// Touch action carried by a platform motion event.
///
/// Mirrors the coarse action codes mobile platforms report for a whole
/// motion event rather than per finger.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchAction {
    /// First finger went down.
    Down,
    /// One or more fingers moved.
    Move,
    /// Last finger lifted.
    Up,
    /// Gesture aborted by the platform.
    Cancel,
    /// A non-primary finger lifted while others remain down.
    PointerUp,
    /// A non-primary finger went down while others remain down.
    PointerDown,
    /// Anything else (hover, outside, scroll...).
    Other,
}

impl TouchAction {
    /// Returns true for the down/move actions that write touch slots.
    ///
    /// Every other action resets the tracked state.
    #[inline]
    pub fn is_contact(self) -> bool {
        matches!(
            self,
            TouchAction::Down | TouchAction::PointerDown | TouchAction::Move
        )
    }
}

/// One contact point of a motion event, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchContact {
    pub x: f32,
    pub y: f32,
}

impl TouchContact {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Platform-agnostic motion event.
///
/// `contacts` are ordered by pointer index; index 0 is the primary finger.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub contacts: Vec<TouchContact>,
}

impl TouchEvent {
    pub fn new(action: TouchAction, contacts: impl Into<Vec<TouchContact>>) -> Self {
        Self {
            action,
            contacts: contacts.into(),
        }
    }

    /// Event with no contacts, e.g. a lift or cancel.
    pub fn release(action: TouchAction) -> Self {
        Self {
            action,
            contacts: Vec::new(),
        }
    }
}
