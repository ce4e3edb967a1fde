//! Keypad edge detection
//!
//! The keypad reports levels. Navigation wants presses. [`EdgeDetector`]
//! debounces the level snapshots and reports keys that went down since the
//! last accepted snapshot; [`InputAction::from_keys`] maps those presses to
//! what the device should do.

use missive_hal::{Key, KeyState};

use crate::clock::Adjust;

/// Joystick direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Center,
}

/// A single press, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputAction {
    /// Joystick press for the navigation state machine
    Navigate(Direction),
    /// Clock adjust key
    Adjust(Adjust),
}

impl InputAction {
    /// Classify one key
    pub const fn from_key(key: Key) -> Self {
        match key {
            Key::Up => InputAction::Navigate(Direction::Up),
            Key::Down => InputAction::Navigate(Direction::Down),
            Key::Left => InputAction::Navigate(Direction::Left),
            Key::Right => InputAction::Navigate(Direction::Right),
            Key::Center => InputAction::Navigate(Direction::Center),
            Key::Hour => InputAction::Adjust(Adjust::Hour),
            Key::Minute => InputAction::Adjust(Adjust::Minute),
        }
    }

    /// Classify every key in `pressed`, in scan order
    pub fn from_keys(pressed: KeyState) -> impl Iterator<Item = InputAction> {
        pressed.keys().map(InputAction::from_key)
    }
}

/// Debounced press detector
///
/// A new level must be seen on `stable_polls` consecutive polls before it
/// is accepted. Only keys that are held in the accepted level and were not
/// held in the previous accepted level are reported.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    stable_polls: u8,
    candidate: KeyState,
    seen: u8,
    accepted: KeyState,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EdgeDetector {
    /// Create a detector that starts with every key released
    pub const fn new(stable_polls: u8) -> Self {
        Self {
            stable_polls: if stable_polls == 0 { 1 } else { stable_polls },
            candidate: KeyState::NONE,
            seen: 0,
            accepted: KeyState::NONE,
        }
    }

    /// Feed one level snapshot, returning keys newly pressed
    pub fn update(&mut self, level: KeyState) -> KeyState {
        if level == self.candidate {
            self.seen = self.seen.saturating_add(1);
        } else {
            self.candidate = level;
            self.seen = 1;
        }

        if self.seen < self.stable_polls || self.candidate == self.accepted {
            return KeyState::NONE;
        }

        let pressed = self.candidate.pressed_since(self.accepted);
        self.accepted = self.candidate;
        pressed
    }

    /// Last accepted level
    pub fn level(&self) -> KeyState {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[Key]) -> KeyState {
        list.iter().fold(KeyState::NONE, |state, key| state.with(*key))
    }

    #[test]
    fn test_press_reported_once() {
        let mut detector = EdgeDetector::default();
        let up = keys(&[Key::Up]);
        assert_eq!(detector.update(up), up);
        assert_eq!(detector.update(up), KeyState::NONE);
        assert_eq!(detector.update(up), KeyState::NONE);
    }

    #[test]
    fn test_release_then_press_again() {
        let mut detector = EdgeDetector::default();
        let center = keys(&[Key::Center]);
        detector.update(center);
        assert_eq!(detector.update(KeyState::NONE), KeyState::NONE);
        assert_eq!(detector.update(center), center);
    }

    #[test]
    fn test_second_key_while_first_held() {
        let mut detector = EdgeDetector::default();
        detector.update(keys(&[Key::Left]));
        let both = keys(&[Key::Left, Key::Hour]);
        assert_eq!(detector.update(both), keys(&[Key::Hour]));
    }

    #[test]
    fn test_debounce_needs_stable_polls() {
        let mut detector = EdgeDetector::new(3);
        let down = keys(&[Key::Down]);
        assert_eq!(detector.update(down), KeyState::NONE);
        assert_eq!(detector.update(down), KeyState::NONE);
        assert_eq!(detector.update(down), down);
        assert_eq!(detector.level(), down);
    }

    #[test]
    fn test_bounce_resets_count() {
        let mut detector = EdgeDetector::new(2);
        let right = keys(&[Key::Right]);
        detector.update(right);
        detector.update(KeyState::NONE);
        assert_eq!(detector.update(right), KeyState::NONE);
        assert_eq!(detector.update(right), right);
    }

    #[test]
    fn test_actions_split_navigation_and_adjust() {
        let pressed = keys(&[Key::Up, Key::Minute]);
        let actions: std::vec::Vec<_> = InputAction::from_keys(pressed).collect();
        assert_eq!(
            actions,
            [
                InputAction::Navigate(Direction::Up),
                InputAction::Adjust(Adjust::Minute)
            ]
        );
    }
}
