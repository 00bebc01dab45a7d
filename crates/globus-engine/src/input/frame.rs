use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, MouseButton};

/// Logical pixels treated as one wheel "line" for high-precision touchpads.
pub(crate) const PIXELS_PER_WHEEL_LINE: f32 = 40.0;

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides events and transition sets for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame (auto-repeat excluded).
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Mouse buttons pressed this frame.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Mouse buttons released this frame.
    pub buttons_released: HashSet<MouseButton>,

    /// Pointer movement accumulated this frame, in logical pixels.
    pub pointer_delta: (f32, f32),

    /// Vertical wheel movement accumulated this frame, in lines.
    /// Positive means away from the user ("scroll up").
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Key presses in arrival order, including auto-repeat.
    ///
    /// Use this for actions that should repeat while a key is held.
    pub fn key_presses(&self) -> impl Iterator<Item = (Key, bool)> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Key { key, state: KeyState::Pressed, repeat, .. } => {
                Some((*key, *repeat))
            }
            _ => None,
        })
    }
}
