//! Missive - serial message terminal firmware
//!
//! Main firmware binary for STM32F207 boards. Lines of text arrive on
//! USART3, are kept in a fixed-capacity store, and are browsed on a 128x64
//! SH1106 OLED with a five-way joystick. Two extra keys set the clock.

#![no_std]
#![no_main]

mod channels;
mod serial;
mod sh1106;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::interrupt::{self, InterruptExt, Priority};
use embassy_stm32::mode::Blocking;
use embassy_stm32::peripherals::I2C1;
use embassy_stm32::usart::Uart;
use embassy_stm32::{bind_interrupts, pac};
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use missive_core::nav::{render_all, Navigator};
use missive_core::tick::TickDispatcher;
use missive_core::{DeviceConfig, HandoffQueue, Ingestor};
use missive_hal_stm32f2::i2c::{I2cBusError, OLED_TIMEOUT_MS};
use missive_hal_stm32f2::keypad::KeyPins;
use missive_hal_stm32f2::usart::usart_config;
use missive_hal_stm32f2::{GpioKeypad, UsartRx};

use crate::channels::{SCREEN, SCREEN_DIRTY, SHARED};
use crate::serial::SerialIsr;
use crate::sh1106::Sh1106;

/// Embedded device configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const DEVICE_CONFIG: &str = include_str!("../device.toml");

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<I2C1>;
});

// Must live forever: the interrupt and the receive task hold its halves
static HANDOFF: StaticCell<HandoffQueue> = StaticCell::new();

// Dropping the driver would gate the USART clock
static UART_DRIVER: StaticCell<Uart<'static, Blocking>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Missive firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let liveness = Duration::from_millis(config.runtime.liveness_ms as u64);

    // OLED on I2C1 (PB6=SCL, PB7=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(OLED_TIMEOUT_MS);
    let i2c = I2c::new(
        p.I2C1, p.PB6, p.PB7, Irqs, p.DMA1_CH6, p.DMA1_CH0, i2c_config,
    );

    let mut oled = Sh1106::new(i2c);
    match oled.init().await {
        Ok(()) => info!("OLED initialized"),
        Err(e) => error!("Failed to initialize OLED: {}", I2cBusError::from(e)),
    }

    draw_empty_screen().await;

    // Joystick and clock keys, all to ground with pull-ups
    let keypad = GpioKeypad::active_low(KeyPins {
        up: Input::new(p.PG11, Pull::Up),
        down: Input::new(p.PG12, Pull::Up),
        left: Input::new(p.PG13, Pull::Up),
        right: Input::new(p.PG14, Pull::Up),
        center: Input::new(p.PG15, Pull::Up),
        hour: Input::new(p.PG8, Pull::Up),
        minute: Input::new(p.PG9, Pull::Up),
    });

    // Serial input on USART3 (PC11=RX, PC10=TX)
    let uart = Uart::new_blocking(
        p.USART3,
        p.PC11, // RX
        p.PC10, // TX
        usart_config(&config.serial.uart()),
    )
    .unwrap();
    UART_DRIVER.init(uart);

    let queue = HANDOFF.init(HandoffQueue::new());
    let (producer, consumer) = queue.split();
    serial::install(SerialIsr {
        ingestor: Ingestor::new(config.ingest.backspace),
        rx: UsartRx::new(pac::USART3),
        producer,
    });
    interrupt::USART3.set_priority(Priority::P1);
    // SAFETY: the handler only reaches shared state through critical-section mutexes
    unsafe { interrupt::USART3.enable() };
    info!("USART3 listening at {} baud", config.serial.baudrate);

    let dispatcher = TickDispatcher::new(&config.tick).unwrap();
    let period = Duration::from_micros(config.tick.period_us());

    spawner.spawn(tasks::tick_task(dispatcher, period)).unwrap();
    spawner.spawn(tasks::clock_task(liveness)).unwrap();
    spawner.spawn(tasks::receive_task(consumer, liveness)).unwrap();
    spawner
        .spawn(tasks::navigation_task(
            keypad,
            config.input.stable_polls,
            liveness,
        ))
        .unwrap();
    spawner.spawn(tasks::display_task(oled, liveness)).unwrap();

    info!("All tasks spawned");
}

/// Parse the embedded device.toml
///
/// An invalid file falls back to the built-in defaults so the device still
/// boots with a usable configuration.
fn load_config() -> DeviceConfig {
    match DeviceConfig::parse(DEVICE_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} Hz tick, {} Hz poll, {} baud, backspace {}",
                config.tick.base_hz,
                config.tick.poll_hz,
                config.serial.baudrate,
                config.ingest.backspace
            );
            config
        }
        Err(e) => {
            warn!("device.toml rejected ({}), using defaults", e);
            DeviceConfig::default()
        }
    }
}

/// Show the header and placeholder before any task runs
async fn draw_empty_screen() {
    let now = SHARED.now();
    let nav = Navigator::new();
    let mut screen = SCREEN.lock().await;
    match SHARED.with_store(|store| render_all(&mut *screen, store, &nav, now)) {
        Ok(()) => SCREEN_DIRTY.signal(()),
        Err(e) => warn!("Initial render failed: {}", e),
    }
}
