//! SH1106 OLED driver
//!
//! Driver for 128x64 SH1106 panels on I2C. The character-cell [`Screen`] is
//! rasterised into a page-organised frame buffer through embedded-graphics,
//! one 8x8 cell per character (16 columns x 8 rows), then pushed page by
//! page.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use missive_display::Screen;
use missive_hal_stm32f2::i2c::OLED_ADDRESS;

const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Pixel size of one character cell
const CELL: u32 = 8;

/// The controller has 132 columns and the panel is wired to the middle 128
const COLUMN_OFFSET: u8 = 2;

#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    /// Frame buffer, one byte per 8 vertical pixels
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C> Sh1106<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Send the power-up sequence and switch the panel on
    pub async fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c).await?;
        }
        Ok(())
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(OLED_ADDRESS, &[0x00, cmd]).await
    }

    /// Push the frame buffer to the panel
    pub async fn flush(&mut self) -> Result<(), I2C::Error> {
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8).await?;
            self.command(cmd::SET_LOW_COLUMN | COLUMN_OFFSET).await?;
            self.command(cmd::SET_HIGH_COLUMN).await?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = 0x40; // data mode
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c.write(OLED_ADDRESS, &data).await?;
        }
        Ok(())
    }
}

impl<I2C> Sh1106<I2C> {
    /// Rasterise every cell of `screen` into the frame buffer
    ///
    /// Highlighted cells are drawn as dark glyphs on a lit background.
    pub fn render(&mut self, screen: &Screen) {
        let style_normal = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let style_inverted = MonoTextStyle::new(&FONT_5X8, BinaryColor::Off);

        for row in 0..screen.rows() {
            let Some(bytes) = screen.row_bytes(row) else {
                continue;
            };
            for (col, &byte) in bytes.iter().enumerate() {
                let origin = Point::new((col as u32 * CELL) as i32, (row as u32 * CELL) as i32);
                let inverted = screen
                    .colors_at(row, col)
                    .is_some_and(|colors| colors.is_inverted());
                let (background, style) = if inverted {
                    (BinaryColor::On, style_inverted)
                } else {
                    (BinaryColor::Off, style_normal)
                };

                let cell = Rectangle::new(origin, Size::new(CELL, CELL));
                let _ = self.fill_solid(&cell, background);

                if byte != b' ' {
                    let mut utf8 = [0u8; 4];
                    let glyph = char::from(byte).encode_utf8(&mut utf8);
                    let text =
                        Text::with_baseline(glyph, origin + Point::new(1, 0), style, Baseline::Top);
                    let _ = text.draw(self);
                }
            }
        }
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1u8 << (y % 8);
            let byte = &mut self.buffer[y / 8][x];
            if color.is_on() {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
        Ok(())
    }
}
