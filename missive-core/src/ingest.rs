//! Character-level message assembly
//!
//! The [`Ingestor`] runs once per received byte from the serial interrupt.
//! It never blocks and does a bounded amount of work per byte: printable
//! characters are staged in a [`PendingBuffer`], backspace steps the write
//! index back, and carriage return (or a full buffer) finalizes the staged
//! text into a [`Message`] offered to the hand-off queue.
//!
//! | Byte          | Effect                                         |
//! |---------------|------------------------------------------------|
//! | `0x20..=0x7E` | append; finalize when the buffer reaches 160   |
//! | `0x7F`        | step back one cell (see [`BackspacePolicy`])   |
//! | `0x0D`        | finalize if anything is staged                 |
//! | anything else | ignored                                        |

use missive_hal::ByteSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::handoff::HandoffSink;
use crate::message::{Message, MESSAGE_CAPACITY};

const CARRIAGE_RETURN: u8 = 0x0D;
const BACKSPACE: u8 = 0x7F;

/// What backspace does at the start of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackspacePolicy {
    /// Index 0 wraps to the last cell
    #[default]
    Wrap,
    /// Index stays at 0
    Clamp,
}

/// Outcome of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestEvent {
    /// Printable byte staged
    Appended,
    /// Write index stepped back
    Erased,
    /// A message was finalized and queued
    Committed,
    /// A message was finalized but the queue was full
    Dropped,
    /// Byte had no effect
    Ignored,
}

impl IngestEvent {
    /// Check if this byte finalized a message (queued or not)
    pub fn finalized(self) -> bool {
        matches!(self, IngestEvent::Committed | IngestEvent::Dropped)
    }
}

/// Staging area for the message being typed
pub struct PendingBuffer {
    text: [u8; MESSAGE_CAPACITY],
    index: usize,
}

impl Default for PendingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingBuffer {
    pub const fn new() -> Self {
        Self {
            text: [0; MESSAGE_CAPACITY],
            index: 0,
        }
    }

    /// Next write position
    pub fn index(&self) -> usize {
        self.index
    }

    /// Staged text up to the write index
    pub fn staged(&self) -> &[u8] {
        &self.text[..self.index]
    }

    fn push(&mut self, byte: u8) {
        self.text[self.index] = byte;
        self.index += 1;
    }

    fn back(&mut self, policy: BackspacePolicy) -> bool {
        match policy {
            BackspacePolicy::Wrap => {
                self.index = (self.index + MESSAGE_CAPACITY - 1) % MESSAGE_CAPACITY;
                true
            }
            BackspacePolicy::Clamp if self.index > 0 => {
                self.index -= 1;
                true
            }
            BackspacePolicy::Clamp => false,
        }
    }

    fn is_full(&self) -> bool {
        self.index >= MESSAGE_CAPACITY
    }

    /// Copy out the staged text and reset the index
    fn take(&mut self) -> Message {
        let message = Message::from_bytes_truncated(self.staged());
        self.index = 0;
        message
    }
}

/// Per-byte message assembler
pub struct Ingestor {
    buffer: PendingBuffer,
    policy: BackspacePolicy,
    /// Part number for the next finalized message of the current line
    part_tag: u8,
    committed: u32,
    dropped: u32,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(BackspacePolicy::default())
    }
}

impl Ingestor {
    /// Create an idle ingestor
    pub const fn new(policy: BackspacePolicy) -> Self {
        Self {
            buffer: PendingBuffer::new(),
            policy,
            part_tag: 0,
            committed: 0,
            dropped: 0,
        }
    }

    /// Feed one received byte
    pub fn feed<S: HandoffSink>(&mut self, byte: u8, sink: &mut S) -> IngestEvent {
        match byte {
            0x20..=0x7E => {
                self.buffer.push(byte);
                if self.buffer.is_full() {
                    let event = self.finalize(sink);
                    self.part_tag = self.part_tag.wrapping_add(1);
                    event
                } else {
                    IngestEvent::Appended
                }
            }
            BACKSPACE => {
                if self.buffer.back(self.policy) {
                    IngestEvent::Erased
                } else {
                    IngestEvent::Ignored
                }
            }
            CARRIAGE_RETURN => {
                let event = if self.buffer.index() > 0 {
                    self.finalize(sink)
                } else {
                    IngestEvent::Ignored
                };
                self.part_tag = 0;
                event
            }
            _ => IngestEvent::Ignored,
        }
    }

    /// Feed every byte waiting in `source`
    ///
    /// Returns how many messages were queued.
    pub fn feed_from<B: ByteSource, S: HandoffSink>(
        &mut self,
        source: &mut B,
        sink: &mut S,
    ) -> usize {
        let mut queued = 0;
        source.drain(|byte| {
            if self.feed(byte, sink) == IngestEvent::Committed {
                queued += 1;
            }
        });
        queued
    }

    fn finalize<S: HandoffSink>(&mut self, sink: &mut S) -> IngestEvent {
        let message = self.buffer.take().with_part_tag(self.part_tag);
        match sink.offer(message) {
            Ok(()) => {
                self.committed = self.committed.wrapping_add(1);
                IngestEvent::Committed
            }
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                IngestEvent::Dropped
            }
        }
    }

    /// Current write index into the pending buffer
    pub fn index(&self) -> usize {
        self.buffer.index()
    }

    /// Text staged so far
    pub fn pending(&self) -> &[u8] {
        self.buffer.staged()
    }

    pub fn policy(&self) -> BackspacePolicy {
        self.policy
    }

    /// Messages queued since start-up
    pub fn committed(&self) -> u32 {
        self.committed
    }

    /// Messages lost to a full queue since start-up
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
