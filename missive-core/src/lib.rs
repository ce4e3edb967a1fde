//! Board-agnostic message pipeline for the Missive messaging firmware
//!
//! Everything between "a byte arrived on the serial line" and "a character
//! cell changed on the screen" lives here, with no dependency on a specific
//! microcontroller:
//!
//! - Fixed-capacity block pool and the linked message store built on it
//! - Per-byte ingestion state machine and the interrupt hand-off queue
//! - Time-of-day clock and the tick dispatcher
//! - Keypad edge detection, navigation and screen layout
//! - Device configuration
//! - The shared context and the step functions the firmware tasks loop over
//!
//! ```text
//! USART ISR ──► Ingestor ──► HandoffQueue ──► receive task ──► MessageStore
//!                                                                   │
//! Ticker ──► TickDispatcher ──► clock task ──► Clock                ▼
//!                         └───► navigation task ◄── Keypad ──► Navigator ──► Screen
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod context;
pub mod handoff;
pub mod ingest;
pub mod input;
pub mod message;
pub mod nav;
pub mod pool;
pub mod store;
pub mod tasks;
pub mod tick;

pub use clock::{Adjust, Timestamp};
pub use config::{ConfigError, DeviceConfig};
pub use context::{Events, Shared};
pub use handoff::{HandoffQueue, HandoffSink, HandoffSource, HANDOFF_CAPACITY};
pub use ingest::{BackspacePolicy, IngestEvent, Ingestor};
pub use message::{Message, MESSAGE_CAPACITY};
pub use pool::{BlockPool, Handle};
pub use store::{Detached, MessageStore, StoreError, STORE_CAPACITY};
