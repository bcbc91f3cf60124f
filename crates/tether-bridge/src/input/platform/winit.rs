use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

use crate::input::{TouchAction, TouchContact, TouchEvent};

/// Folds winit's per-finger touch events into whole motion events.
///
/// winit reports one event per finger; the touch state expects one event per
/// gesture step carrying every contact in pointer order. The tracker keeps
/// the fingers currently down (oldest first) and emits the matching action.
///
/// With `mouse_as_touch`, the left mouse button drives a single contact so
/// desktop builds can be exercised without a touchscreen.
#[derive(Debug, Default)]
pub struct ContactTracker {
    fingers: Vec<(u64, TouchContact)>,

    mouse_as_touch: bool,
    mouse_down: bool,
    cursor: Option<TouchContact>,
}

impl ContactTracker {
    pub fn new(mouse_as_touch: bool) -> Self {
        Self {
            mouse_as_touch,
            ..Self::default()
        }
    }

    /// Number of fingers currently tracked.
    pub fn fingers_down(&self) -> usize {
        self.fingers.len()
    }

    /// Translates a winit `WindowEvent` into a `TouchEvent`.
    ///
    /// Returns `None` for events that carry no touch information.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<TouchEvent> {
        match event {
            WindowEvent::Touch(touch) => Some(self.on_touch(touch)),

            WindowEvent::Focused(false) if !self.fingers.is_empty() || self.mouse_down => {
                // Platforms without a cancel signal still drop contacts on focus loss.
                self.fingers.clear();
                self.mouse_down = false;
                Some(TouchEvent::release(TouchAction::Cancel))
            }

            WindowEvent::CursorMoved { position, .. } if self.mouse_as_touch => {
                let c = to_contact(*position);
                self.cursor = Some(c);
                self.mouse_down
                    .then(|| TouchEvent::new(TouchAction::Move, vec![c]))
            }

            WindowEvent::CursorLeft { .. } if self.mouse_as_touch => {
                self.cursor = None;
                if self.mouse_down {
                    self.mouse_down = false;
                    return Some(TouchEvent::release(TouchAction::Cancel));
                }
                None
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } if self.mouse_as_touch => match state {
                ElementState::Pressed => {
                    let c = self.cursor?;
                    self.mouse_down = true;
                    Some(TouchEvent::new(TouchAction::Down, vec![c]))
                }
                ElementState::Released if self.mouse_down => {
                    self.mouse_down = false;
                    Some(TouchEvent::release(TouchAction::Up))
                }
                ElementState::Released => None,
            },

            _ => None,
        }
    }

    fn on_touch(&mut self, touch: &Touch) -> TouchEvent {
        let contact = to_contact(touch.location);

        let action = match touch.phase {
            TouchPhase::Started => {
                self.fingers.retain(|(id, _)| *id != touch.id);
                self.fingers.push((touch.id, contact));
                if self.fingers.len() == 1 {
                    TouchAction::Down
                } else {
                    TouchAction::PointerDown
                }
            }
            TouchPhase::Moved => {
                match self.fingers.iter_mut().find(|(id, _)| *id == touch.id) {
                    Some((_, c)) => *c = contact,
                    None => self.fingers.push((touch.id, contact)),
                }
                TouchAction::Move
            }
            TouchPhase::Ended => {
                self.fingers.retain(|(id, _)| *id != touch.id);
                if self.fingers.is_empty() {
                    TouchAction::Up
                } else {
                    TouchAction::PointerUp
                }
            }
            TouchPhase::Cancelled => {
                self.fingers.clear();
                TouchAction::Cancel
            }
        };

        TouchEvent::new(
            action,
            self.fingers.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
        )
    }
}

fn to_contact(pos: PhysicalPosition<f64>) -> TouchContact {
    TouchContact::new(pos.x as f32, pos.y as f32)
}
