//! Navigation task
//!
//! Polls the keypad, moves the cursor and draws into the shared screen
//! buffer. It is the only writer of [`SCREEN`].

use defmt::*;
use embassy_time::{with_timeout, Duration};
use missive_core::tasks::{navigation_step, wait_navigation, NavigationState};
use missive_hal_stm32f2::GpioKeypad;

use crate::channels::{SCREEN, SCREEN_DIRTY, SHARED};

#[embassy_executor::task]
pub async fn navigation_task(mut keypad: GpioKeypad<'static>, stable_polls: u8, liveness: Duration) {
    info!("Navigation task started");

    let mut state = NavigationState::new(stable_polls);
    loop {
        let Ok(trigger) = with_timeout(liveness, wait_navigation(&SHARED)).await else {
            warn!("Navigation task: no poll for {} ms", liveness.as_millis());
            continue;
        };

        let Ok(mut screen) = with_timeout(liveness, SCREEN.lock()).await else {
            warn!("Navigation task: screen lock timed out");
            continue;
        };
        match navigation_step(&SHARED, &mut state, trigger, &mut keypad, &mut *screen) {
            Ok(report) => {
                if report.drew {
                    SCREEN_DIRTY.signal(());
                }
                if report.adjusts > 0 {
                    trace!("{} clock adjust request(s)", report.adjusts);
                }
            }
            Err(e) => warn!("Render failed: {}", e),
        }
    }
}
