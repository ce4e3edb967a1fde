//! Receive task
//!
//! Drains messages the USART interrupt finished into the store.

use defmt::*;
use embassy_time::{with_timeout, Duration};
use missive_core::handoff::HandoffConsumer;
use missive_core::tasks::{receive_step, wait_message_ready};

use crate::channels::SHARED;
use crate::serial::{self, SerialStats};

#[embassy_executor::task]
pub async fn receive_task(mut consumer: HandoffConsumer<'static>, liveness: Duration) {
    info!("Receive task started");

    let mut last = SerialStats::default();
    loop {
        // A timeout still drains, so nothing sits in the queue behind a lost wake-up
        if with_timeout(liveness, wait_message_ready(&SHARED)).await.is_err() {
            trace!("Receive task idle");
        }

        let report = receive_step(&SHARED, &mut consumer);
        if report.stored > 0 {
            debug!(
                "Stored {} message(s), {} held",
                report.stored,
                SHARED.message_count()
            );
        }
        if report.dropped > 0 {
            warn!("Store full, dropped {} message(s)", report.dropped);
        }

        let stats = serial::stats();
        if stats != last {
            if stats.dropped != last.dropped {
                warn!(
                    "Hand-off queue full, {} message(s) dropped so far",
                    stats.dropped
                );
            }
            if stats.overruns != last.overruns || stats.line_errors != last.line_errors {
                warn!(
                    "USART3: {} overrun(s), {} line error(s)",
                    stats.overruns, stats.line_errors
                );
            }
            last = stats;
        }
    }
}
