//! Configuration type definitions

use missive_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::ingest::BackspacePolicy;

/// Default base tick rate (Hz)
pub const DEFAULT_BASE_HZ: u32 = 100;

/// Default input poll rate (Hz)
pub const DEFAULT_POLL_HZ: u32 = 5;

/// Default liveness timeout for blocking waits (ms)
pub const DEFAULT_LIVENESS_MS: u32 = 2000;

/// Tick dispatcher rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickConfig {
    /// Rate of the hardware ticker
    pub base_hz: u32,
    /// Rate of keypad polling, must divide `base_hz`
    pub poll_hz: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            base_hz: DEFAULT_BASE_HZ,
            poll_hz: DEFAULT_POLL_HZ,
        }
    }
}

impl TickConfig {
    /// Ticker period in microseconds
    pub fn period_us(&self) -> u64 {
        1_000_000 / self.base_hz.max(1) as u64
    }

    /// Base ticks between polls
    pub fn poll_divider(&self) -> u32 {
        self.base_hz / self.poll_hz.max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_hz == 0 || self.poll_hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.poll_hz > self.base_hz {
            return Err(ConfigError::PollRateTooHigh);
        }
        if self.base_hz % self.poll_hz != 0 {
            return Err(ConfigError::PollRateNotDivisor);
        }
        Ok(())
    }
}

/// Ingestion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IngestConfig {
    pub backspace: BackspacePolicy,
}

/// Keypad settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    /// Identical consecutive polls before a level change is accepted
    pub stable_polls: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { stable_polls: 1 }
    }
}

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: UartConfig::default().baudrate,
        }
    }
}

impl SerialConfig {
    /// UART frame settings (always 8N1)
    pub fn uart(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baudrate,
            ..UartConfig::default()
        }
    }
}

/// Task runtime settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuntimeConfig {
    /// Upper bound on any single blocking wait before the task loops again
    pub liveness_ms: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            liveness_ms: DEFAULT_LIVENESS_MS,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub tick: TickConfig,
    pub ingest: IngestConfig,
    pub input: InputConfig,
    pub serial: SerialConfig,
    pub runtime: RuntimeConfig,
}

impl DeviceConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tick.validate()?;
        if self.input.stable_polls == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        if self.runtime.liveness_ms == 0 {
            return Err(ConfigError::ZeroLiveness);
        }
        Ok(())
    }
}
