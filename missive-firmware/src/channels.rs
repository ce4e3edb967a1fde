//! Statics shared between tasks and the USART interrupt
//!
//! Everything here is `'static` so tasks can borrow it for their whole life.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use missive_core::Shared;
use missive_display::Screen;

/// Messages the store holds on this board
///
/// Each slot is roughly 180 bytes, so 400 slots fit the F207's 128 KiB of
/// internal SRAM with room left for stacks and the executor. The board's
/// external SRAM is not brought up, so the pool stays internal.
pub const STORE_SLOTS: usize = 400;

/// Store, clock and task wake-ups
pub static SHARED: Shared<CriticalSectionRawMutex, STORE_SLOTS> = Shared::new();

/// Character-cell image of the panel
///
/// Written by the navigation task, read by the display task.
pub static SCREEN: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Screen changed and needs to be pushed to the panel
pub static SCREEN_DIRTY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
