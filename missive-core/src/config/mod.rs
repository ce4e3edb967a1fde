//! Device configuration
//!
//! Runtime settings for the tick rates, ingestion, input debounce, serial
//! link and task liveness. The firmware embeds a `device.toml` and parses it
//! with [`DeviceConfig::parse`] at start-up.

pub mod parse;
pub mod types;

pub use parse::ConfigError;
pub use types::*;
