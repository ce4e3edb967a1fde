//! STM32F2 board support for the Missive firmware
//!
//! Implements the `missive-hal` traits on top of embassy-stm32 for the
//! STM32F207 family:
//!
//! - [`usart::UsartRx`]: interrupt-context [`ByteSource`] reading the USART
//!   data register directly
//! - [`keypad::GpioKeypad`]: five-way joystick plus two clock adjust keys on
//!   plain GPIO inputs
//! - [`i2c`]: bus settings and error conversion for the OLED panel
//!
//! # Features
//!
//! - `stm32f207ig` - STM32F207IG (MCBSTM32F200 evaluation board)
//! - `stm32f207zg` - STM32F207ZG (Nucleo-F207ZG)
//! - `defmt` - Enable debug formatting support
//!
//! [`ByteSource`]: missive_hal::ByteSource

#![no_std]

pub mod i2c;
pub mod keypad;
pub mod usart;

pub use keypad::GpioKeypad;
pub use usart::UsartRx;
