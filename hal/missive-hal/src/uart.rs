//! Serial receive abstractions
//!
//! The ingestion path pulls bytes one at a time from interrupt context, so
//! the only operation it needs is a non-blocking read.

/// Non-blocking byte source
///
/// Implementations must return immediately. They are called from the
/// receive interrupt handler and must never wait for data.
pub trait ByteSource {
    /// Take the next received byte, if one is waiting
    fn recv_byte(&mut self) -> Option<u8>;

    /// Drain every waiting byte into `sink`, returning how many were read
    fn drain<F: FnMut(u8)>(&mut self, mut sink: F) -> usize {
        let mut count = 0;
        while let Some(byte) = self.recv_byte() {
            sink(byte);
            count += 1;
        }
        count
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn recv_byte(&mut self) -> Option<u8> {
        (**self).recv_byte()
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted<'a> {
        bytes: &'a [u8],
    }

    impl ByteSource for Scripted<'_> {
        fn recv_byte(&mut self) -> Option<u8> {
            let (&first, rest) = self.bytes.split_first()?;
            self.bytes = rest;
            Some(first)
        }
    }

    #[test]
    fn test_drain_reads_until_empty() {
        let mut source = Scripted { bytes: b"ab\r" };
        let mut seen = [0u8; 4];
        let mut n = 0;
        let count = source.drain(|b| {
            seen[n] = b;
            n += 1;
        });
        assert_eq!(count, 3);
        assert_eq!(&seen[..3], b"ab\r");
        assert_eq!(source.recv_byte(), None);
    }

    #[test]
    fn test_default_config_is_9600_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
