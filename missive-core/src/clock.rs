//! Time-of-day clock
//!
//! A wall clock with no date. Advanced once per second by the tick
//! dispatcher and nudged by the hour/minute adjust keys. There is no
//! battery-backed RTC; the clock starts at midnight on every reset.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rendered width of a timestamp (`HH:MM:SS`)
pub const TIMESTAMP_LEN: usize = 8;

/// Hours/minutes/seconds of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

const SECONDS_PER_DAY: u32 = 24 * 3600;

impl Timestamp {
    /// 00:00:00
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Build a timestamp, rejecting out-of-range fields
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 && seconds < 60 {
            Some(Self {
                hours,
                minutes,
                seconds,
            })
        } else {
            None
        }
    }

    /// Wrap `seconds` into a single day
    pub const fn from_seconds_of_day(seconds: u32) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            hours: (seconds / 3600) as u8,
            minutes: (seconds / 60 % 60) as u8,
            seconds: (seconds % 60) as u8,
        }
    }

    /// 0..=23
    pub const fn hours(&self) -> u8 {
        self.hours
    }

    /// 0..=59
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// 0..=59
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Advance one second, carrying into minutes and hours
    pub fn tick(&mut self) {
        // Deserialized values skip `new`, so fields may be out of range
        *self = Self::from_seconds_of_day(self.seconds_of_day() + 1);
    }

    /// Advance the hour field only (23 wraps to 0)
    pub fn bump_hour(&mut self) {
        self.hours = (self.hours % 24 + 1) % 24;
    }

    /// Advance the minute field only (59 wraps to 0, hours untouched)
    pub fn bump_minute(&mut self) {
        self.minutes = (self.minutes % 60 + 1) % 60;
    }

    /// Seconds since midnight
    pub const fn seconds_of_day(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Render as `HH:MM:SS`
    pub fn format(&self) -> String<TIMESTAMP_LEN> {
        let mut out = String::new();
        // Always fits: two digits per field, fields are range-checked
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        );
        out
    }
}

/// Clock adjustment requested from the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Adjust {
    Hour,
    Minute,
}

impl Adjust {
    /// Apply this adjustment to `time`
    pub fn apply(self, time: &mut Timestamp) {
        match self {
            Adjust::Hour => time.bump_hour(),
            Adjust::Minute => time.bump_minute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_carries_into_minutes() {
        let mut t = Timestamp::new(10, 15, 59).unwrap();
        t.tick();
        assert_eq!(t, Timestamp::new(10, 16, 0).unwrap());
    }

    #[test]
    fn test_tick_carries_into_hours() {
        let mut t = Timestamp::new(10, 59, 59).unwrap();
        t.tick();
        assert_eq!(t, Timestamp::new(11, 0, 0).unwrap());
    }

    #[test]
    fn test_tick_wraps_at_midnight() {
        let mut t = Timestamp::new(23, 59, 59).unwrap();
        t.tick();
        assert_eq!(t, Timestamp::MIDNIGHT);
    }

    #[test]
    fn test_bump_minute_does_not_carry() {
        let mut t = Timestamp::new(7, 59, 30).unwrap();
        t.bump_minute();
        assert_eq!(t, Timestamp::new(7, 0, 30).unwrap());
    }

    #[test]
    fn test_bump_hour_wraps() {
        let mut t = Timestamp::new(23, 5, 6).unwrap();
        Adjust::Hour.apply(&mut t);
        assert_eq!(t, Timestamp::new(0, 5, 6).unwrap());
    }

    #[test]
    fn test_full_day_of_ticks_returns_to_start() {
        let start = Timestamp::new(13, 37, 0).unwrap();
        let mut t = start;
        for _ in 0..86_400 {
            t.tick();
        }
        assert_eq!(t, start);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Timestamp::new(24, 0, 0).is_none());
        assert!(Timestamp::new(0, 60, 0).is_none());
        assert!(Timestamp::new(0, 0, 60).is_none());
    }

    #[test]
    fn test_out_of_range_fields_wrap_instead_of_overflowing() {
        let mut t = Timestamp {
            hours: 255,
            minutes: 255,
            seconds: 255,
        };
        t.tick();
        assert!(t.hours() < 24 && t.minutes() < 60 && t.seconds() < 60);

        let mut t = Timestamp {
            hours: 255,
            minutes: 255,
            seconds: 0,
        };
        t.bump_hour();
        t.bump_minute();
        assert_eq!((t.hours(), t.minutes()), (16, 16));
    }

    #[test]
    fn test_from_seconds_of_day_wraps() {
        assert_eq!(
            Timestamp::from_seconds_of_day(86_400 + 61),
            Timestamp::new(0, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_format() {
        let t = Timestamp::new(9, 5, 3).unwrap();
        assert_eq!(t.format().as_str(), "09:05:03");
        assert_eq!(t.seconds_of_day(), 9 * 3600 + 5 * 60 + 3);
    }
}
