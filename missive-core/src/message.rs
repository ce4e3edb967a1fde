//! Fixed-size text message
//!
//! Messages are plain byte arrays sized for the worst case, so they can be
//! moved through the hand-off queue and stored in pool blocks without any
//! allocation.

use crate::clock::Timestamp;

/// Maximum message length in bytes
pub const MESSAGE_CAPACITY: usize = 160;

/// Characters per display line
pub const LINE_WIDTH: usize = 16;

/// Lines of message text visible at once
pub const PAGE_LINES: usize = 4;

/// A received text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: [u8; MESSAGE_CAPACITY],
    len: u8,
    part_tag: u8,
    time: Timestamp,
}

impl Default for Message {
    fn default() -> Self {
        Self::empty()
    }
}

impl Message {
    /// An empty message stamped at midnight
    pub const fn empty() -> Self {
        Self {
            text: [0; MESSAGE_CAPACITY],
            len: 0,
            part_tag: 0,
            time: Timestamp::MIDNIGHT,
        }
    }

    /// Copy `bytes` into a new message
    ///
    /// Returns `None` if `bytes` exceeds [`MESSAGE_CAPACITY`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MESSAGE_CAPACITY {
            return None;
        }
        let mut message = Self::empty();
        message.text[..bytes.len()].copy_from_slice(bytes);
        message.len = bytes.len() as u8;
        Some(message)
    }

    /// Copy `bytes`, truncating at [`MESSAGE_CAPACITY`]
    pub fn from_bytes_truncated(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MESSAGE_CAPACITY);
        let mut message = Self::empty();
        message.text[..len].copy_from_slice(&bytes[..len]);
        message.len = len as u8;
        message
    }

    /// Valid text bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.text[..self.len as usize]
    }

    /// Text as a string slice (ingested text is always printable ASCII)
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the message has no text
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte at `index`, or `None` past the end of the text
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Part number within a line that overflowed the buffer (0 = whole line)
    pub fn part_tag(&self) -> u8 {
        self.part_tag
    }

    /// Set the part number
    pub fn with_part_tag(mut self, part_tag: u8) -> Self {
        self.part_tag = part_tag;
        self
    }

    /// Time the message was committed to the store
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Stamp the message with its commit time
    pub fn stamp(&mut self, time: Timestamp) {
        self.time = time;
    }

    /// Number of display lines the text occupies
    pub fn line_count(&self) -> usize {
        self.len().div_ceil(LINE_WIDTH)
    }

    /// Last valid scroll row (0 when the text fits on one page)
    pub fn max_row(&self) -> u8 {
        self.line_count().saturating_sub(PAGE_LINES) as u8
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Message {{ len: {}, part: {}, time: {}, text: {=str} }}",
            self.len,
            self.part_tag,
            self.time,
            self.as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let m = Message::from_bytes(b"hello").unwrap();
        assert_eq!(m.as_bytes(), b"hello");
        assert_eq!(m.as_str(), "hello");
        assert_eq!(m.len(), 5);
        assert!(!m.is_empty());
    }

    #[test]
    fn test_from_bytes_rejects_oversize() {
        assert!(Message::from_bytes(&[b'x'; MESSAGE_CAPACITY + 1]).is_none());
        let m = Message::from_bytes_truncated(&[b'x'; MESSAGE_CAPACITY + 1]);
        assert_eq!(m.len(), MESSAGE_CAPACITY);
    }

    #[test]
    fn test_max_row_for_short_messages_is_zero() {
        for len in [0, 1, 16, 48, 64] {
            let m = Message::from_bytes(&[b'a'; 64][..len]).unwrap();
            assert_eq!(m.max_row(), 0, "len {}", len);
        }
    }

    #[test]
    fn test_max_row_for_long_messages() {
        assert_eq!(Message::from_bytes(&[b'a'; 65]).unwrap().max_row(), 1);
        assert_eq!(Message::from_bytes(&[b'a'; 80]).unwrap().max_row(), 1);
        assert_eq!(Message::from_bytes(&[b'a'; 81]).unwrap().max_row(), 2);
        let full = Message::from_bytes(&[b'a'; MESSAGE_CAPACITY]).unwrap();
        assert_eq!(full.line_count(), 10);
        assert_eq!(full.max_row(), 6);
    }

    #[test]
    fn test_byte_at_past_end() {
        let m = Message::from_bytes(b"ab").unwrap();
        assert_eq!(m.byte_at(1), Some(b'b'));
        assert_eq!(m.byte_at(2), None);
    }

    #[test]
    fn test_stamp_and_tag() {
        let mut m = Message::from_bytes(b"x").unwrap().with_part_tag(2);
        let t = Timestamp::new(1, 2, 3).unwrap();
        m.stamp(t);
        assert_eq!(m.time(), t);
        assert_eq!(m.part_tag(), 2);
    }
}
