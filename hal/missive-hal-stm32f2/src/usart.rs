//! USART receive path for STM32F2
//!
//! The receive interrupt reads the data register directly instead of going
//! through embassy's async driver: the ingestor must see every byte inside
//! the interrupt, without a task switch in between.

use embassy_stm32::pac;
use embassy_stm32::usart;
use missive_hal::{ByteSource, DataBits, Parity, StopBits, UartConfig};

/// Interrupt-context byte source over a USART's registers
///
/// Configure the peripheral first (baud rate, pins, enable) with
/// embassy-stm32, then hand its register block to [`UsartRx::new`].
pub struct UsartRx {
    regs: pac::usart::Usart,
    overruns: u32,
    line_errors: u32,
}

impl UsartRx {
    /// Wrap an already configured USART
    pub const fn new(regs: pac::usart::Usart) -> Self {
        Self {
            regs,
            overruns: 0,
            line_errors: 0,
        }
    }

    /// Enable the "receive register not empty" interrupt
    pub fn listen(&self) {
        self.regs.cr1().modify(|w| w.set_rxneie(true));
    }

    /// Bytes lost because the data register was not read in time
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Bytes discarded for framing, noise or parity errors
    pub fn line_errors(&self) -> u32 {
        self.line_errors
    }
}

impl ByteSource for UsartRx {
    fn recv_byte(&mut self) -> Option<u8> {
        let sr = self.regs.sr().read();
        if !sr.rxne() {
            return None;
        }

        if sr.ore() {
            self.overruns = self.overruns.wrapping_add(1);
        }
        // Reading DR after SR clears RXNE and every error flag
        let byte = self.regs.dr().read().dr() as u8;
        if sr.fe() || sr.ne() || sr.pe() {
            self.line_errors = self.line_errors.wrapping_add(1);
            return None;
        }
        Some(byte)
    }
}

/// Build the embassy-stm32 USART configuration for `config`
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    out
}
