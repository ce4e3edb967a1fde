//! Keypad and joystick abstractions
//!
//! The board reports which keys are held *right now* (level, not edge).
//! Edge detection and debouncing happen in the consumer.

/// A single physical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Key {
    /// Joystick up
    Up = 0,
    /// Joystick down
    Down = 1,
    /// Joystick left
    Left = 2,
    /// Joystick right
    Right = 3,
    /// Joystick push
    Center = 4,
    /// Clock adjust: advance hours
    Hour = 5,
    /// Clock adjust: advance minutes
    Minute = 6,
}

impl Key {
    /// Every key, in scan order
    pub const ALL: [Key; 7] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Center,
        Key::Hour,
        Key::Minute,
    ];

    /// Bit mask of this key inside a [`KeyState`]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Bitmask of currently pressed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState(u8);

impl KeyState {
    /// No key pressed
    pub const NONE: Self = Self(0);

    /// Build from a raw bitmask (bits above [`Key::Minute`] are discarded)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    /// Raw bitmask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a key is held
    pub const fn contains(self, key: Key) -> bool {
        self.0 & key.mask() != 0
    }

    /// Return a copy with `key` marked as held
    pub const fn with(self, key: Key) -> Self {
        Self(self.0 | key.mask())
    }

    /// Mark `key` as held or released
    pub fn set(&mut self, key: Key, held: bool) {
        if held {
            self.0 |= key.mask();
        } else {
            self.0 &= !key.mask();
        }
    }

    /// Check if nothing is held
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keys held now that were not held in `previous`
    pub const fn pressed_since(self, previous: KeyState) -> KeyState {
        Self(self.0 & !previous.0)
    }

    /// Iterate held keys in scan order
    pub fn keys(self) -> impl Iterator<Item = Key> {
        Key::ALL.into_iter().filter(move |key| self.contains(*key))
    }
}

/// Source of key level snapshots
///
/// `read_key` is called from the input-poll task at the poll rate.
pub trait Keypad {
    /// Read the current level of every key
    fn read_key(&mut self) -> KeyState;
}

impl<T: Keypad + ?Sized> Keypad for &mut T {
    fn read_key(&mut self) -> KeyState {
        (**self).read_key()
    }
}
