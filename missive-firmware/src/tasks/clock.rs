//! System clock task

use defmt::*;
use embassy_time::{with_timeout, Duration};
use missive_core::tasks::{clock_step, wait_clock, ClockTrigger};

use crate::channels::SHARED;

#[embassy_executor::task]
pub async fn clock_task(liveness: Duration) {
    info!("Clock task started");

    loop {
        let Ok(trigger) = with_timeout(liveness, wait_clock(&SHARED)).await else {
            warn!("Clock task: no second tick for {} ms", liveness.as_millis());
            continue;
        };

        let now = clock_step(&SHARED, trigger);
        if let ClockTrigger::Adjust(adjust) = trigger {
            info!("Clock adjusted ({}): {}", adjust, now.format().as_str());
        }
    }
}
