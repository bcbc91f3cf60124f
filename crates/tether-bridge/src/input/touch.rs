use parking_lot::Mutex;

use crate::coords::SurfaceSize;

use super::types::TouchEvent;

/// Coordinate stored in an inactive slot.
pub const NO_CONTACT: f32 = -1.0;

/// A single tracked contact slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl TouchPoint {
    /// Slot with no contact: `(-1, -1)`, inactive.
    pub const INACTIVE: TouchPoint = TouchPoint {
        x: NO_CONTACT,
        y: NO_CONTACT,
        active: false,
    };

    #[inline]
    pub const fn active(x: f32, y: f32) -> Self {
        Self { x, y, active: true }
    }
}

impl Default for TouchPoint {
    fn default() -> Self {
        Self::INACTIVE
    }
}

/// Consistent copy of both touch slots taken at one point in time.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TouchSnapshot {
    pub primary: TouchPoint,
    pub secondary: TouchPoint,
}

impl TouchSnapshot {
    /// Both slots inactive.
    pub const EMPTY: TouchSnapshot = TouchSnapshot {
        primary: TouchPoint::INACTIVE,
        secondary: TouchPoint::INACTIVE,
    };

    /// True while at least the primary finger is down.
    #[inline]
    pub fn has_touch(&self) -> bool {
        self.primary.active
    }

    /// Secondary slot, only when the primary is also active.
    #[inline]
    pub fn multi_touch(&self) -> Option<TouchPoint> {
        (self.primary.active && self.secondary.active).then_some(self.secondary)
    }

    /// Active coordinates divided by the surface size (0..1 across the surface).
    ///
    /// Inactive slots keep the `(-1, -1)` sentinel. An invalid size returns
    /// the snapshot unchanged.
    pub fn normalized(&self, size: SurfaceSize) -> TouchSnapshot {
        if !size.is_valid() {
            return *self;
        }

        let (w, h) = (size.width as f32, size.height as f32);
        let scale = |p: TouchPoint| {
            if p.active {
                TouchPoint::active(p.x / w, p.y / h)
            } else {
                TouchPoint::INACTIVE
            }
        };

        TouchSnapshot {
            primary: scale(self.primary),
            secondary: scale(self.secondary),
        }
    }
}

/// Current contact points for one window.
///
/// Written by the UI thread on every motion event and read once per frame by
/// the render thread. Both slots live under a single lock, so a reader always
/// observes the pair produced by one writer call.
#[derive(Debug, Default)]
pub struct TouchState {
    slots: Mutex<TouchSnapshot>,
}

impl TouchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_primary(&self, x: f32, y: f32) {
        self.slots.lock().primary = TouchPoint::active(x, y);
    }

    pub fn set_secondary(&self, x: f32, y: f32) {
        self.slots.lock().secondary = TouchPoint::active(x, y);
    }

    /// Resets both slots to inactive.
    pub fn clear(&self) {
        *self.slots.lock() = TouchSnapshot::EMPTY;
    }

    pub fn snapshot(&self) -> TouchSnapshot {
        *self.slots.lock()
    }

    /// Applies a motion event.
    ///
    /// Down and move actions write the first two contacts; further contacts
    /// are ignored. With a single contact the secondary slot keeps its last
    /// value. Any other action clears every slot, even if fingers remain on
    /// the surface: tracking is per event, not per pointer id.
    pub fn apply(&self, event: &TouchEvent) {
        let mut slots = self.slots.lock();

        if !event.action.is_contact() {
            *slots = TouchSnapshot::EMPTY;
            log::trace!("touch cleared on {:?}", event.action);
            return;
        }

        let mut contacts = event.contacts.iter();

        if let Some(c) = contacts.next() {
            slots.primary = TouchPoint::active(c.x, c.y);
        }
        if let Some(c) = contacts.next() {
            slots.secondary = TouchPoint::active(c.x, c.y);
        }
    }
}
