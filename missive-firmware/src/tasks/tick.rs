//! Base ticker
//!
//! Drives the tick dispatcher at `base_hz`, which raises the per-second and
//! keypad-poll signals.

use defmt::*;
use embassy_time::{Duration, Ticker};
use missive_core::tasks::tick_step;
use missive_core::tick::TickDispatcher;

use crate::channels::SHARED;

#[embassy_executor::task]
pub async fn tick_task(mut dispatcher: TickDispatcher, period: Duration) {
    info!(
        "Tick task started: {} Hz base, poll every {} ticks",
        dispatcher.base_hz(),
        dispatcher.poll_divider()
    );

    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        tick_step(&SHARED, &mut dispatcher);
    }
}
