//! Tick dispatcher
//!
//! Divides one base-rate ticker into the derived events the other tasks
//! wait on: a 1 Hz second event for the clock and the keypad poll event for
//! navigation. The dispatcher only counts; delivering the events is up to
//! the caller (see [`crate::tasks::tick_step`]).

use crate::config::{ConfigError, TickConfig};

/// Events due on one base tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickEvents {
    /// One second elapsed
    pub second: bool,
    /// Keypad should be polled
    pub poll: bool,
}

impl TickEvents {
    /// Check if nothing is due
    pub fn is_empty(&self) -> bool {
        !self.second && !self.poll
    }
}

/// Modulo counter over the base tick
#[derive(Debug, Clone)]
pub struct TickDispatcher {
    base_hz: u32,
    poll_divider: u32,
    count: u32,
}

impl TickDispatcher {
    /// Build a dispatcher, rejecting rates that don't divide evenly
    pub fn new(config: &TickConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            base_hz: config.base_hz,
            poll_divider: config.poll_divider(),
            count: 0,
        })
    }

    /// Advance one base tick and report what is due
    pub fn tick(&mut self) -> TickEvents {
        self.count = (self.count + 1) % self.base_hz;
        TickEvents {
            second: self.count == 0,
            poll: self.count % self.poll_divider == 0,
        }
    }

    pub fn base_hz(&self) -> u32 {
        self.base_hz
    }

    /// Base ticks per poll event
    pub fn poll_divider(&self) -> u32 {
        self.poll_divider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_events(dispatcher: &mut TickDispatcher, ticks: u32) -> (u32, u32) {
        let (mut seconds, mut polls) = (0, 0);
        for _ in 0..ticks {
            let events = dispatcher.tick();
            seconds += events.second as u32;
            polls += events.poll as u32;
        }
        (seconds, polls)
    }

    #[test]
    fn test_default_rates() {
        let mut dispatcher = TickDispatcher::new(&TickConfig::default()).unwrap();
        assert_eq!(count_events(&mut dispatcher, 100), (1, 5));
        assert_eq!(count_events(&mut dispatcher, 1000), (10, 50));
    }

    #[test]
    fn test_second_fires_on_hundredth_tick() {
        let mut dispatcher = TickDispatcher::new(&TickConfig::default()).unwrap();
        for _ in 0..99 {
            assert!(!dispatcher.tick().second);
        }
        let events = dispatcher.tick();
        assert!(events.second);
        assert!(events.poll);
    }

    #[test]
    fn test_poll_every_divider_ticks() {
        let config = TickConfig {
            base_hz: 100,
            poll_hz: 25,
        };
        let mut dispatcher = TickDispatcher::new(&config).unwrap();
        let polls: std::vec::Vec<bool> = (0..8).map(|_| dispatcher.tick().poll).collect();
        assert_eq!(polls, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_poll_at_base_rate() {
        let config = TickConfig {
            base_hz: 50,
            poll_hz: 50,
        };
        let mut dispatcher = TickDispatcher::new(&config).unwrap();
        assert!((0..10).all(|_| dispatcher.tick().poll));
    }

    #[test]
    fn test_rejects_non_divisor() {
        let config = TickConfig {
            base_hz: 100,
            poll_hz: 30,
        };
        assert_eq!(
            TickDispatcher::new(&config).err(),
            Some(ConfigError::PollRateNotDivisor)
        );
    }
}
