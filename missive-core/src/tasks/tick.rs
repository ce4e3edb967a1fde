//! Tick fan-out

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::context::Shared;
use crate::tick::{TickDispatcher, TickEvents};

/// Advance the dispatcher one base tick and raise whatever is due
pub fn tick_step<M: RawMutex, const N: usize>(
    shared: &Shared<M, N>,
    dispatcher: &mut TickDispatcher,
) -> TickEvents {
    let events = dispatcher.tick();
    if events.second {
        shared.events.second.signal(());
    }
    if events.poll {
        shared.events.poll.signal(());
    }
    events
}
