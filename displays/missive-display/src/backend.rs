//! Display backend trait
//!
//! Defines the character-cell interface every display collaborator offers.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Row or column outside the display
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Cell color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Blue,
    Navy,
    Red,
    Green,
    Yellow,
}

impl Color {
    /// Light colors map to "pixel on" on monochrome panels
    pub const fn is_light(self) -> bool {
        matches!(self, Color::White | Color::Yellow | Color::Green)
    }
}

/// Foreground/background pair applied to a whole cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Colors {
    pub fg: Color,
    pub bg: Color,
}

impl Colors {
    /// Regular text
    pub const NORMAL: Self = Self {
        fg: Color::White,
        bg: Color::Black,
    };

    /// Selected / highlighted text
    pub const HIGHLIGHT: Self = Self {
        fg: Color::Black,
        bg: Color::White,
    };

    /// Build a pair
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    /// Swap foreground and background
    pub const fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
        }
    }

    /// True when a monochrome panel should draw this cell inverted
    pub const fn is_inverted(self) -> bool {
        self.bg.is_light() && !self.fg.is_light()
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Character-cell display
///
/// Addressing is `(row, col)` in character cells from the top-left corner.
/// Text that runs past the right edge is clipped. Cells are replaced whole;
/// there is no blending.
pub trait TextDisplay {
    /// Error type for drawing operations
    type Error;

    /// Draw a string starting at `(row, col)`
    fn draw_text(&mut self, row: u8, col: u8, text: &str, colors: Colors)
        -> Result<(), Self::Error>;

    /// Clear every cell to a blank in the normal colors
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    /// Draw a single character
    fn draw_char(&mut self, row: u8, col: u8, ch: char, colors: Colors) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        self.draw_text(row, col, ch.encode_utf8(&mut buf), colors)
    }

    /// Blank `width` cells starting at `(row, col)`
    fn blank(&mut self, row: u8, col: u8, width: u8, colors: Colors) -> Result<(), Self::Error> {
        for offset in 0..width {
            self.draw_char(row, col.saturating_add(offset), ' ', colors)?;
        }
        Ok(())
    }
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    type Error = T::Error;

    fn draw_text(
        &mut self,
        row: u8,
        col: u8,
        text: &str,
        colors: Colors,
    ) -> Result<(), Self::Error> {
        (**self).draw_text(row, col, text, colors)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn dimensions(&self) -> (u8, u8) {
        (**self).dimensions()
    }
}
