//! Display task
//!
//! Copies the screen buffer to the SH1106 whenever it changed.

use defmt::*;
use embassy_stm32::i2c::{I2c, Master};
use embassy_stm32::mode::Async;
use embassy_time::{with_timeout, Duration};
use missive_hal_stm32f2::i2c::I2cBusError;

use crate::channels::{SCREEN, SCREEN_DIRTY};
use crate::sh1106::Sh1106;

pub type Oled = Sh1106<I2c<'static, Async, Master>>;

#[embassy_executor::task]
pub async fn display_task(mut oled: Oled, liveness: Duration) {
    info!("Display task started");

    loop {
        if with_timeout(liveness, SCREEN_DIRTY.wait()).await.is_err() {
            continue;
        }

        {
            let Ok(mut screen) = with_timeout(liveness, SCREEN.lock()).await else {
                warn!("Display task: screen lock timed out");
                continue;
            };
            if !screen.is_dirty() {
                continue;
            }
            oled.render(&screen);
            screen.mark_clean();
        }

        match oled.flush().await {
            Ok(()) => trace!("Display updated"),
            Err(e) => warn!("OLED flush failed: {}", I2cBusError::from(e)),
        }
    }
}
