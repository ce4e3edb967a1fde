//! Character-cell display abstraction for Missive
//!
//! This crate provides:
//! - `TextDisplay` trait: the `(row, col)` text interface the UI renders through
//! - `Colors` foreground/background pairs
//! - `Screen`: a character-cell frame buffer implementing `TextDisplay`
//!
//! # Architecture
//!
//! The navigation logic never talks to a panel directly. It renders into a
//! [`Screen`] held behind the display lock; a separate flush task copies the
//! screen to the physical panel (SH1106 OLED on the reference board). Host
//! tests render into the same [`Screen`] and inspect the cells.

#![no_std]

pub mod backend;
pub mod screen;

// Re-export key types
pub use backend::{Color, Colors, DisplayError, TextDisplay};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
