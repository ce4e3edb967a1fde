//! Shared device state
//!
//! Everything more than one task touches lives in one [`Shared`] value that
//! the firmware places in a `static` and hands to each task. The store and
//! the clock each sit behind their own blocking mutex; tasks wake each other
//! through the coalescing [`Signal`]s in [`Events`].
//!
//! Lock order when both are needed: clock first, then store.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::clock::{Adjust, Timestamp};
use crate::message::Message;
use crate::pool::Handle;
use crate::store::{MessageStore, StoreError};

/// Task wake-ups
///
/// Signals are level-triggered and coalescing: several raises before the
/// waiter runs collapse into one wake-up.
pub struct Events<M: RawMutex> {
    /// Interrupt queued at least one finished message
    pub message_ready: Signal<M, ()>,
    /// Receive task linked at least one message into the store
    pub message_stored: Signal<M, ()>,
    /// One second elapsed
    pub second: Signal<M, ()>,
    /// Keypad poll due
    pub poll: Signal<M, ()>,
    /// Clock value changed
    pub clock_changed: Signal<M, ()>,
    /// Hour adjust key pressed
    pub bump_hour: Signal<M, ()>,
    /// Minute adjust key pressed
    pub bump_minute: Signal<M, ()>,
}

impl<M: RawMutex> Events<M> {
    pub const fn new() -> Self {
        Self {
            message_ready: Signal::new(),
            message_stored: Signal::new(),
            second: Signal::new(),
            poll: Signal::new(),
            clock_changed: Signal::new(),
            bump_hour: Signal::new(),
            bump_minute: Signal::new(),
        }
    }

    /// Raise the signal for a clock adjustment
    pub fn request_adjust(&self, adjust: Adjust) {
        match adjust {
            Adjust::Hour => self.bump_hour.signal(()),
            Adjust::Minute => self.bump_minute.signal(()),
        }
    }
}

impl<M: RawMutex> Default for Events<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Store, clock and wake-up signals for a device holding `N` messages
pub struct Shared<M: RawMutex, const N: usize> {
    store: Mutex<M, RefCell<MessageStore<N>>>,
    clock: Mutex<M, RefCell<Timestamp>>,
    pub events: Events<M>,
}

impl<M: RawMutex, const N: usize> Default for Shared<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> Shared<M, N> {
    /// Empty store, clock at midnight
    pub const fn new() -> Self {
        Self {
            store: Mutex::new(RefCell::new(MessageStore::new())),
            clock: Mutex::new(RefCell::new(Timestamp::MIDNIGHT)),
            events: Events::new(),
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut MessageStore<N>) -> R) -> R {
        self.store.lock(|store| f(&mut store.borrow_mut()))
    }

    /// Snapshot of the clock
    pub fn now(&self) -> Timestamp {
        self.clock.lock(|clock| *clock.borrow())
    }

    /// Mutate the clock, returning the new value
    pub fn update_clock(&self, f: impl FnOnce(&mut Timestamp)) -> Timestamp {
        self.clock.lock(|clock| {
            let mut clock = clock.borrow_mut();
            f(&mut clock);
            *clock
        })
    }

    /// Stamp `message` with the current time and append it
    pub fn commit(&self, mut message: Message) -> Result<Handle, StoreError> {
        message.stamp(self.now());
        self.with_store(|store| store.commit(message))
    }

    /// Number of stored messages
    pub fn message_count(&self) -> u32 {
        self.with_store(|store| store.count())
    }
}
