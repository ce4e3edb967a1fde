//! Clock task step

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::clock::{Adjust, Timestamp};
use crate::context::Shared;

/// What woke the clock task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockTrigger {
    Second,
    Adjust(Adjust),
}

/// Wait for the next second or adjust request
pub async fn wait_clock<M: RawMutex, const N: usize>(shared: &Shared<M, N>) -> ClockTrigger {
    let events = &shared.events;
    match select3(
        events.second.wait(),
        events.bump_hour.wait(),
        events.bump_minute.wait(),
    )
    .await
    {
        Either3::First(()) => ClockTrigger::Second,
        Either3::Second(()) => ClockTrigger::Adjust(Adjust::Hour),
        Either3::Third(()) => ClockTrigger::Adjust(Adjust::Minute),
    }
}

/// Apply one trigger and tell navigation to redraw the clock
pub fn clock_step<M: RawMutex, const N: usize>(
    shared: &Shared<M, N>,
    trigger: ClockTrigger,
) -> Timestamp {
    let now = shared.update_clock(|time| match trigger {
        ClockTrigger::Second => time.tick(),
        ClockTrigger::Adjust(adjust) => adjust.apply(time),
    });
    shared.events.clock_changed.signal(());
    now
}
