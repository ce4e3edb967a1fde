//! Joystick and adjust keys on GPIO
//!
//! Every key is a momentary switch to ground with the internal pull-up
//! enabled, so a held key reads low.

use embassy_stm32::gpio::{Input, Level};
use missive_hal::{Key, KeyState, Keypad};

/// Key inputs in [`Key`] order
pub struct KeyPins<'d> {
    pub up: Input<'d>,
    pub down: Input<'d>,
    pub left: Input<'d>,
    pub right: Input<'d>,
    pub center: Input<'d>,
    pub hour: Input<'d>,
    pub minute: Input<'d>,
}

/// Level-reporting keypad over seven GPIO inputs
pub struct GpioKeypad<'d> {
    pins: KeyPins<'d>,
    /// Level that means "held"
    active: Level,
}

impl<'d> GpioKeypad<'d> {
    /// Keys that pull their input to ground when held
    pub fn active_low(pins: KeyPins<'d>) -> Self {
        Self {
            pins,
            active: Level::Low,
        }
    }

    /// Keys that drive their input high when held
    pub fn active_high(pins: KeyPins<'d>) -> Self {
        Self {
            pins,
            active: Level::High,
        }
    }

    fn input(&self, key: Key) -> &Input<'d> {
        match key {
            Key::Up => &self.pins.up,
            Key::Down => &self.pins.down,
            Key::Left => &self.pins.left,
            Key::Right => &self.pins.right,
            Key::Center => &self.pins.center,
            Key::Hour => &self.pins.hour,
            Key::Minute => &self.pins.minute,
        }
    }
}

impl Keypad for GpioKeypad<'_> {
    fn read_key(&mut self) -> KeyState {
        let mut state = KeyState::NONE;
        for key in Key::ALL {
            state.set(key, self.input(key).get_level() == self.active);
        }
        state
    }
}
