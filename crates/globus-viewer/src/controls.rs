//! Keyboard and wheel bindings.

use globus_engine::input::Key;

/// Something the user asked the viewer to do.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Exit,
    ZoomIn,
    ZoomOut,
    ResetView,
    ReloadTexture,
    ToggleLighting,
    ToggleShadows,
    IntensityDown,
    IntensityUp,
    NextLight,
    PrevLight,
    ShowInfo,
    SelectLight(u8),
    /// A digit with no preset behind it (8, 9).
    PresetHint(u8),
}

impl Action {
    /// Whether holding the key should keep firing the action.
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Action::ZoomIn | Action::ZoomOut | Action::IntensityDown | Action::IntensityUp
        )
    }
}

/// Maps a physical key to its action.
///
/// `+` and `_` share keys with `=` and `-`, so modifiers are ignored.
pub fn action_for_key(key: Key) -> Option<Action> {
    if let Some(d) = key.digit() {
        return Some(if d <= 7 { Action::SelectLight(d) } else { Action::PresetHint(d) });
    }

    let action = match key {
        Key::Escape => Action::Exit,
        Key::Equal | Key::NumpadAdd => Action::ZoomIn,
        Key::Minus | Key::NumpadSubtract => Action::ZoomOut,
        Key::R => Action::ResetView,
        Key::T => Action::ReloadTexture,
        Key::L => Action::ToggleLighting,
        Key::S => Action::ToggleShadows,
        Key::BracketLeft => Action::IntensityDown,
        Key::BracketRight => Action::IntensityUp,
        Key::N => Action::NextLight,
        Key::P => Action::PrevLight,
        Key::I => Action::ShowInfo,
        _ => return None,
    };
    Some(action)
}

/// Actions for a frame's key presses, in arrival order.
///
/// Auto-repeat events only produce actions that [`Action::repeats`].
pub fn key_actions(presses: impl IntoIterator<Item = (Key, bool)>) -> Vec<Action> {
    presses
        .into_iter()
        .filter_map(|(key, repeat)| {
            let action = action_for_key(key)?;
            (!repeat || action.repeats()).then_some(action)
        })
        .collect()
}

/// Turns fractional wheel movement into whole zoom steps.
///
/// Touchpads report small pixel deltas; the remainder is kept until it adds
/// up to a full line.
#[derive(Debug, Default)]
pub struct WheelAccumulator {
    residual: f32,
}

impl WheelAccumulator {
    /// Returns signed zoom steps (positive = zoom in).
    pub fn feed(&mut self, lines: f32) -> i32 {
        if !lines.is_finite() {
            return 0;
        }
        self.residual += lines;
        let steps = self.residual.trunc();
        self.residual -= steps;
        steps as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for_key(Key::Escape), Some(Action::Exit));
        assert_eq!(action_for_key(Key::Equal), Some(Action::ZoomIn));
        assert_eq!(action_for_key(Key::NumpadAdd), Some(Action::ZoomIn));
        assert_eq!(action_for_key(Key::Minus), Some(Action::ZoomOut));
        assert_eq!(action_for_key(Key::R), Some(Action::ResetView));
        assert_eq!(action_for_key(Key::T), Some(Action::ReloadTexture));
        assert_eq!(action_for_key(Key::L), Some(Action::ToggleLighting));
        assert_eq!(action_for_key(Key::S), Some(Action::ToggleShadows));
        assert_eq!(action_for_key(Key::BracketLeft), Some(Action::IntensityDown));
        assert_eq!(action_for_key(Key::BracketRight), Some(Action::IntensityUp));
        assert_eq!(action_for_key(Key::N), Some(Action::NextLight));
        assert_eq!(action_for_key(Key::P), Some(Action::PrevLight));
        assert_eq!(action_for_key(Key::I), Some(Action::ShowInfo));
        assert_eq!(action_for_key(Key::Unknown(0)), None);
    }

    #[test]
    fn digits_select_presets_or_hint() {
        assert_eq!(action_for_key(Key::Digit0), Some(Action::SelectLight(0)));
        assert_eq!(action_for_key(Key::Digit7), Some(Action::SelectLight(7)));
        assert_eq!(action_for_key(Key::Digit8), Some(Action::PresetHint(8)));
        assert_eq!(action_for_key(Key::Digit9), Some(Action::PresetHint(9)));
    }

    #[test]
    fn repeats_only_fire_continuous_actions() {
        let actions = key_actions([
            (Key::Equal, false),
            (Key::Equal, true),
            (Key::L, true),
            (Key::BracketRight, true),
            (Key::L, false),
        ]);
        assert_eq!(
            actions,
            vec![Action::ZoomIn, Action::ZoomIn, Action::IntensityUp, Action::ToggleLighting]
        );
    }

    #[test]
    fn wheel_accumulates_fractions() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.feed(1.0), 1);
        assert_eq!(wheel.feed(-2.0), -2);
        assert_eq!(wheel.feed(0.5), 0);
        assert_eq!(wheel.feed(0.5), 1);
        assert_eq!(wheel.feed(f32::NAN), 0);
    }
}
