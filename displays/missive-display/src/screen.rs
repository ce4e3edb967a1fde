//! Screen buffer types
//!
//! Provides a character-cell buffer for text-mode displays.

use heapless::String;

use crate::backend::{Colors, DisplayError, TextDisplay};

/// Number of character rows on the panel
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns on the panel
pub const SCREEN_COLS: usize = 16;

/// Character-cell screen buffer
///
/// Every cell holds one ASCII byte and its colors. Non-ASCII characters are
/// stored as `?`. The buffer tracks whether it changed since the last flush.
#[derive(Clone)]
pub struct Screen {
    /// Cell characters
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    /// Cell colors
    colors: [[Colors; SCREEN_COLS]; SCREEN_ROWS],
    /// Whether the screen needs to be flushed
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new blank screen
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
            colors: [[Colors::NORMAL; SCREEN_COLS]; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Blank every cell
    pub fn clear_cells(&mut self) {
        for row in &mut self.cells {
            row.fill(b' ');
        }
        for row in &mut self.colors {
            row.fill(Colors::NORMAL);
        }
        self.dirty = true;
    }

    /// Write one cell, ignoring out-of-range coordinates
    pub fn put(&mut self, row: usize, col: usize, byte: u8, colors: Colors) {
        if row < SCREEN_ROWS && col < SCREEN_COLS {
            let byte = if byte.is_ascii() && !byte.is_ascii_control() {
                byte
            } else {
                b'?'
            };
            self.cells[row][col] = byte;
            self.colors[row][col] = colors;
            self.dirty = true;
        }
    }

    /// Raw bytes of a row
    pub fn row_bytes(&self, row: usize) -> Option<&[u8; SCREEN_COLS]> {
        self.cells.get(row)
    }

    /// A row as text
    pub fn line(&self, row: usize) -> String<SCREEN_COLS> {
        let mut line = String::new();
        if let Some(bytes) = self.row_bytes(row) {
            for &b in bytes {
                let _ = line.push(b as char);
            }
        }
        line
    }

    /// Character at a cell
    pub fn char_at(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Colors at a cell
    pub fn colors_at(&self, row: usize, col: usize) -> Option<Colors> {
        self.colors.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Check if screen needs flushing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after flushing)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mark screen as dirty (needs flush)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Get number of rows
    pub const fn rows(&self) -> usize {
        SCREEN_ROWS
    }

    /// Get number of columns
    pub const fn cols(&self) -> usize {
        SCREEN_COLS
    }
}

impl TextDisplay for Screen {
    type Error = DisplayError;

    fn draw_text(
        &mut self,
        row: u8,
        col: u8,
        text: &str,
        colors: Colors,
    ) -> Result<(), Self::Error> {
        let (row, col) = (row as usize, col as usize);
        if row >= SCREEN_ROWS || col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        for (offset, ch) in text.chars().take(SCREEN_COLS - col).enumerate() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.put(row, col + offset, byte, colors);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.clear_cells();
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for row in 0..SCREEN_ROWS {
            if row > 0 {
                defmt::write!(f, "|");
            }
            defmt::write!(f, "{}", self.line(row).as_str());
        }
        defmt::write!(f, "]");
    }
}
