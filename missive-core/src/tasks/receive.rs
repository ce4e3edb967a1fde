//! Serial receive path
//!
//! [`interrupt_step`] runs in the USART interrupt: it feeds received bytes
//! to the ingestor and raises `message_ready` when something was queued.
//! [`receive_step`] runs in the receive task: it drains the hand-off queue
//! into the store.

use embassy_sync::blocking_mutex::raw::RawMutex;
use missive_hal::ByteSource;

use crate::context::Shared;
use crate::handoff::{HandoffSink, HandoffSource};
use crate::ingest::Ingestor;
use crate::store::StoreError;

/// Result of draining the hand-off queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveReport {
    /// Messages linked into the store
    pub stored: u32,
    /// Messages lost because the pool was full
    pub dropped: u32,
}

/// Feed every waiting byte to the ingestor
///
/// Never blocks. Returns how many messages were queued.
pub fn interrupt_step<M, const N: usize, B, S>(
    shared: &Shared<M, N>,
    ingestor: &mut Ingestor,
    source: &mut B,
    sink: &mut S,
) -> usize
where
    M: RawMutex,
    B: ByteSource,
    S: HandoffSink,
{
    let queued = ingestor.feed_from(source, sink);
    if queued > 0 {
        shared.events.message_ready.signal(());
    }
    queued
}

/// Wait until the interrupt queued something
pub async fn wait_message_ready<M: RawMutex, const N: usize>(shared: &Shared<M, N>) {
    shared.events.message_ready.wait().await
}

/// Move every queued message into the store, oldest first
pub fn receive_step<M, const N: usize, S>(shared: &Shared<M, N>, source: &mut S) -> ReceiveReport
where
    M: RawMutex,
    S: HandoffSource,
{
    let mut report = ReceiveReport::default();
    while let Some(message) = source.take() {
        match shared.commit(message) {
            Ok(_) => report.stored += 1,
            Err(StoreError::Full) => report.dropped += 1,
        }
    }
    if report.stored > 0 {
        shared.events.message_stored.signal(());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Timestamp;
    use crate::handoff::HandoffQueue;
    use crate::message::Message;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    struct Bytes<'a>(&'a [u8]);

    impl ByteSource for Bytes<'_> {
        fn recv_byte(&mut self) -> Option<u8> {
            let (first, rest) = self.0.split_first()?;
            self.0 = rest;
            Some(*first)
        }
    }

    #[test]
    fn test_interrupt_signals_only_when_queued() {
        let shared: Shared<NoopRawMutex, 4> = Shared::new();
        let mut ingestor = Ingestor::default();
        let mut queue = HandoffQueue::new();

        interrupt_step(&shared, &mut ingestor, &mut Bytes(b"partial"), &mut queue);
        assert!(!shared.events.message_ready.signaled());

        let queued = interrupt_step(&shared, &mut ingestor, &mut Bytes(b"\r"), &mut queue);
        assert_eq!(queued, 1);
        assert!(shared.events.message_ready.signaled());
    }

    #[test]
    fn test_drain_keeps_fifo_order_and_stamps() {
        let shared: Shared<NoopRawMutex, 8> = Shared::new();
        shared.update_clock(|t| *t = Timestamp::new(9, 15, 0).unwrap());

        let mut ingestor = Ingestor::default();
        let mut queue = HandoffQueue::new();
        let (mut tx, mut rx) = queue.split();
        interrupt_step(&shared, &mut ingestor, &mut Bytes(b"one\rtwo\rthree\r"), &mut tx);

        block_on(wait_message_ready(&shared));
        let report = receive_step(&shared, &mut rx);
        assert_eq!(report, ReceiveReport { stored: 3, dropped: 0 });
        assert!(shared.events.message_stored.signaled());

        shared.with_store(|store| {
            let texts: std::vec::Vec<_> = store.iter().map(|(_, m)| m.as_str()).collect();
            assert_eq!(texts, ["one", "two", "three"]);
            assert!(store
                .iter()
                .all(|(_, m)| m.time() == Timestamp::new(9, 15, 0).unwrap()));
        });
    }

    #[test]
    fn test_full_pool_drops_and_continues() {
        let shared: Shared<NoopRawMutex, 2> = Shared::new();
        let mut queue = HandoffQueue::new();
        for text in ["a", "b", "c"] {
            queue.offer(Message::from_bytes(text.as_bytes()).unwrap()).unwrap();
        }

        let report = receive_step(&shared, &mut queue);
        assert_eq!(report, ReceiveReport { stored: 2, dropped: 1 });
        assert!(queue.take().is_none());
        assert_eq!(shared.message_count(), 2);
    }

    #[test]
    fn test_empty_drain_does_not_notify() {
        let shared: Shared<NoopRawMutex, 2> = Shared::new();
        let mut queue = HandoffQueue::new();
        assert_eq!(receive_step(&shared, &mut queue), ReceiveReport::default());
        assert!(!shared.events.message_stored.signaled());
    }
}
