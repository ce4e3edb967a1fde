//! Navigation state machine
//!
//! Owns the cursor and the delete prompt. Every transition takes the store
//! by `&mut`, so the caller holds the store lock for the whole
//! read-modify-write, including re-pointing the cursor before a deleted
//! block is released.

use crate::input::Direction;
use crate::pool::Handle;
use crate::store::MessageStore;

/// Delete prompt selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Choice {
    Yes,
    #[default]
    No,
}

impl Choice {
    pub fn toggled(self) -> Self {
        match self {
            Choice::Yes => Choice::No,
            Choice::No => Choice::Yes,
        }
    }
}

/// Top-level navigation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Reading messages (or looking at the empty placeholder)
    #[default]
    Browsing,
    /// Asking whether to delete the message under the cursor
    ConfirmDelete(Choice),
}

/// Position inside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Message being shown
    pub message: Option<Handle>,
    /// First visible text line
    pub row: u8,
}

/// Result of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavOutcome {
    /// Nothing changed
    Ignored,
    /// Page scrolled inside the same message
    Scrolled,
    /// Cursor moved to another message
    Moved,
    /// Delete prompt opened
    Prompted,
    /// Prompt selection changed
    Toggled,
    /// Prompt closed with "No"
    Cancelled,
    /// Message deleted and cursor re-pointed
    Deleted,
}

impl NavOutcome {
    /// Check if the screen must be redrawn
    pub fn needs_redraw(self) -> bool {
        self != NavOutcome::Ignored
    }
}

/// Screen area affected by a store notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    /// Position/count only
    Header,
    /// Whole screen
    Full,
}

/// Cursor, pagination and delete-confirmation state
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    cursor: Cursor,
    mode: Mode,
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            cursor: Cursor {
                message: None,
                row: 0,
            },
            mode: Mode::Browsing,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Replace a stale cursor with the newest message (or none)
    ///
    /// Returns `true` if the cursor changed.
    pub fn resolve<const N: usize>(&mut self, store: &MessageStore<N>) -> bool {
        match self.cursor.message {
            Some(handle) if store.contains(handle) => false,
            Some(_) => {
                self.point_at(store.tail());
                self.mode = Mode::Browsing;
                true
            }
            None => false,
        }
    }

    /// React to messages appended by the receive task
    pub fn on_message_stored<const N: usize>(&mut self, store: &MessageStore<N>) -> Redraw {
        let stale = self.resolve(store);
        if self.cursor.message.is_none() && store.tail().is_some() {
            self.point_at(store.tail());
            return Redraw::Full;
        }
        if stale {
            Redraw::Full
        } else {
            Redraw::Header
        }
    }

    /// Apply one joystick press
    pub fn on_direction<const N: usize>(
        &mut self,
        direction: Direction,
        store: &mut MessageStore<N>,
    ) -> NavOutcome {
        let resolved = self.resolve(store);
        let Some(current) = self.cursor.message else {
            // Empty store: nothing to scroll, move through or delete
            return if resolved {
                NavOutcome::Moved
            } else {
                NavOutcome::Ignored
            };
        };

        match self.mode {
            Mode::Browsing => self.browse(direction, current, store),
            Mode::ConfirmDelete(choice) => match direction {
                Direction::Center => {
                    self.mode = Mode::Browsing;
                    match choice {
                        Choice::Yes => self.delete(current, store),
                        Choice::No => NavOutcome::Cancelled,
                    }
                }
                _ => {
                    self.mode = Mode::ConfirmDelete(choice.toggled());
                    NavOutcome::Toggled
                }
            },
        }
    }

    fn browse<const N: usize>(
        &mut self,
        direction: Direction,
        current: Handle,
        store: &MessageStore<N>,
    ) -> NavOutcome {
        let max_row = store.get(current).map(|m| m.max_row()).unwrap_or(0);
        match direction {
            Direction::Left if self.cursor.row > 0 => {
                self.cursor.row -= 1;
                NavOutcome::Scrolled
            }
            Direction::Right if self.cursor.row < max_row => {
                self.cursor.row += 1;
                NavOutcome::Scrolled
            }
            Direction::Up => self.step_to(store.next(current)),
            Direction::Down => self.step_to(store.prev(current)),
            Direction::Center => {
                self.mode = Mode::ConfirmDelete(Choice::No);
                NavOutcome::Prompted
            }
            Direction::Left | Direction::Right => NavOutcome::Ignored,
        }
    }

    fn step_to(&mut self, neighbor: Option<Handle>) -> NavOutcome {
        match neighbor {
            Some(handle) => {
                self.point_at(Some(handle));
                NavOutcome::Moved
            }
            None => NavOutcome::Ignored,
        }
    }

    fn delete<const N: usize>(&mut self, current: Handle, store: &mut MessageStore<N>) -> NavOutcome {
        let fallback = store.prev(current).or(store.next(current));
        match store.remove(current) {
            Some(node) => {
                self.point_at(fallback);
                store.release(node);
                NavOutcome::Deleted
            }
            None => {
                self.point_at(store.tail());
                NavOutcome::Moved
            }
        }
    }

    fn point_at(&mut self, message: Option<Handle>) {
        self.cursor = Cursor { message, row: 0 };
    }
}
