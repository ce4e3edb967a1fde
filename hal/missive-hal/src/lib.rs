//! Missive Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the messaging core needs from
//! the board. Chip-specific crates (`missive-hal-stm32f2`) implement them;
//! host tests implement them with scripted fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (missive-firmware)         │
//! └─────────────────────────────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌────────────────────┐  ┌──────────────────┐
//! │  missive-core      │  │ missive-hal-     │
//! │  (pipeline logic)  │  │   stm32f2        │
//! └────────────────────┘  └──────────────────┘
//!            │                     │
//!            └──────────┬──────────┘
//!                       ▼
//! ┌─────────────────────────────────────────┐
//! │  missive-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::ByteSource`] - Non-blocking byte receive, callable from an ISR
//! - [`keypad::Keypad`] - Level snapshot of the joystick and adjust keys

#![no_std]
#![deny(unsafe_code)]

pub mod keypad;
pub mod uart;

pub use keypad::{Key, KeyState, Keypad};
pub use uart::{ByteSource, DataBits, Parity, StopBits, UartConfig};
