use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Held keys and buttons plus the pointer position, for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in design pixels, `None` while outside the window.
    pub pointer: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` and records the transitions it causes in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases that happen while unfocused are never delivered.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { position } => self.pointer = Some(*position),

            InputEvent::PointerLeft => self.pointer = None,

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton { button, state, position } => {
                self.pointer = Some(*position);
                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::Wheel { lines } => frame.wheel += *lines,
        }

        frame.events.push(ev);
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn press_and_release_are_recorded_once() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::A, ButtonState::Pressed));
        s.apply_event(&mut f, key(Key::A, ButtonState::Pressed));
        assert!(s.key_down(Key::A));
        assert!(f.key_pressed(Key::A));
        assert_eq!(f.events.len(), 2);

        f.clear();
        s.apply_event(&mut f, key(Key::A, ButtonState::Released));
        assert!(!s.key_down(Key::A));
        assert!(f.keys_released.contains(&Key::A));
        assert!(!f.key_pressed(Key::A));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::Space, ButtonState::Pressed));
        s.apply_event(
            &mut f,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                position: Vec2::new(3.0, 4.0),
            },
        );
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(s.buttons_down.is_empty());
        assert_eq!(s.pointer, Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn wheel_accumulates_per_frame() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::Wheel { lines: Vec2::new(0.0, 1.0) });
        s.apply_event(&mut f, InputEvent::Wheel { lines: Vec2::new(0.0, 2.0) });
        assert_eq!(f.wheel, Vec2::new(0.0, 3.0));
        f.clear();
        assert_eq!(f.wheel, Vec2::ZERO);
    }

    #[test]
    fn pointer_leave_forgets_position() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::PointerMoved { position: Vec2::new(1.0, 1.0) });
        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer, None);
    }
}
