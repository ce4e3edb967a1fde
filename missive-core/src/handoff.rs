//! Interrupt-to-task hand-off queue
//!
//! A lock-free single-producer/single-consumer FIFO of finished messages.
//! The receive interrupt is the only producer and the receive task the only
//! consumer. The queue never grows; when it is full the producer drops the
//! message instead of waiting.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::message::Message;

/// Messages the queue can hold at once
pub const HANDOFF_CAPACITY: usize = 4;

/// Backing queue (`heapless` keeps one slot empty, hence the `+ 1`)
pub type HandoffQueue = Queue<Message, { HANDOFF_CAPACITY + 1 }>;

/// Producer half of a [`HandoffQueue`]
pub type HandoffProducer<'a> = Producer<'a, Message, { HANDOFF_CAPACITY + 1 }>;

/// Consumer half of a [`HandoffQueue`]
pub type HandoffConsumer<'a> = Consumer<'a, Message, { HANDOFF_CAPACITY + 1 }>;

/// Where the ingestor places finished messages
pub trait HandoffSink {
    /// Enqueue without waiting, handing the message back if there is no room
    fn offer(&mut self, message: Message) -> Result<(), Message>;
}

/// Where the receive task takes finished messages from
pub trait HandoffSource {
    /// Dequeue the oldest waiting message
    fn take(&mut self) -> Option<Message>;
}

impl<const Q: usize> HandoffSink for Producer<'_, Message, Q> {
    fn offer(&mut self, message: Message) -> Result<(), Message> {
        self.enqueue(message)
    }
}

impl<const Q: usize> HandoffSource for Consumer<'_, Message, Q> {
    fn take(&mut self) -> Option<Message> {
        self.dequeue()
    }
}

impl<const Q: usize> HandoffSink for Queue<Message, Q> {
    fn offer(&mut self, message: Message) -> Result<(), Message> {
        self.enqueue(message)
    }
}

impl<const Q: usize> HandoffSource for Queue<Message, Q> {
    fn take(&mut self) -> Option<Message> {
        self.dequeue()
    }
}

impl<T: HandoffSink + ?Sized> HandoffSink for &mut T {
    fn offer(&mut self, message: Message) -> Result<(), Message> {
        (**self).offer(message)
    }
}

impl<T: HandoffSource + ?Sized> HandoffSource for &mut T {
    fn take(&mut self) -> Option<Message> {
        (**self).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> Message {
        Message::from_bytes(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_capacity_is_four() {
        let queue = HandoffQueue::new();
        assert_eq!(queue.capacity(), HANDOFF_CAPACITY);
    }

    #[test]
    fn test_full_queue_rejects_without_ghosts() {
        let mut queue = HandoffQueue::new();
        let (mut tx, mut rx) = queue.split();
        for text in ["1", "2", "3", "4"] {
            assert!(tx.offer(msg(text)).is_ok());
        }

        let rejected = tx.offer(msg("5")).unwrap_err();
        assert_eq!(rejected.as_str(), "5");
        assert_eq!(rx.len(), HANDOFF_CAPACITY);

        for text in ["1", "2", "3", "4"] {
            assert_eq!(rx.take().map(|m| m.as_str() == text), Some(true));
        }
        assert!(rx.take().is_none());
    }

    #[test]
    fn test_room_frees_after_take() {
        let mut queue = HandoffQueue::new();
        for text in ["a", "b", "c", "d"] {
            queue.offer(msg(text)).unwrap();
        }
        assert!(queue.offer(msg("e")).is_err());
        assert_eq!(queue.take().map(|m| m.len()), Some(1));
        assert!(queue.offer(msg("e")).is_ok());
    }
}
