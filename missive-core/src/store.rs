//! Message store
//!
//! A doubly linked list of messages in arrival order, built entirely on a
//! [`BlockPool`]. The head is the oldest message and the tail the newest.
//!
//! Nodes move between two states:
//!
//! - **linked**: reachable from `head`/`tail`, addressed by [`Handle`]
//! - **detached**: allocated but not in the list, owned by a [`Detached`]
//!   token
//!
//! A [`Detached`] token is the only way to link a node or to free its block,
//! and both consume it. A node therefore can't be linked twice, freed twice,
//! or freed while still linked.

use crate::message::Message;
use crate::pool::{BlockPool, Handle};

/// Number of messages the device retains
pub const STORE_CAPACITY: usize = 1000;

/// Store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Every block in the pool is in use
    Full,
}

/// One message plus its list links
pub struct StoreNode {
    message: Message,
    prev: Option<Handle>,
    next: Option<Handle>,
    linked: bool,
}

impl StoreNode {
    const fn new(message: Message) -> Self {
        Self {
            message,
            prev: None,
            next: None,
            linked: false,
        }
    }
}

/// Ownership token for an allocated node that is not in the list
///
/// Pass it to [`MessageStore::push_newest`] / [`MessageStore::push_oldest`]
/// to link it, or to [`MessageStore::release`] to free its block. Dropping
/// it without doing either leaks the block.
#[must_use = "a detached node must be pushed or released"]
#[derive(Debug, PartialEq, Eq)]
pub struct Detached {
    handle: Handle,
}

impl Detached {
    /// Handle the node had while linked (stale once released)
    pub fn handle(&self) -> Handle {
        self.handle
    }
}

/// Doubly linked message list over a fixed pool of `N` blocks
pub struct MessageStore<const N: usize> {
    pool: BlockPool<StoreNode, N>,
    head: Option<Handle>,
    tail: Option<Handle>,
    count: u32,
}

impl<const N: usize> Default for MessageStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageStore<N> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            pool: BlockPool::new(),
            head: None,
            tail: None,
            count: 0,
        }
    }

    /// Number of linked messages
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Check if no message is linked
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of messages
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Check if no block is left for a new message
    pub fn is_full(&self) -> bool {
        self.pool.is_full()
    }

    /// Blocks in use, including detached nodes
    pub fn blocks_in_use(&self) -> usize {
        self.pool.live()
    }

    /// Oldest message
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    /// Newest message
    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    /// Take a block for `message` without linking it
    pub fn allocate(&mut self, message: Message) -> Result<Detached, StoreError> {
        self.pool
            .alloc(StoreNode::new(message))
            .map(|handle| Detached { handle })
            .map_err(|_| StoreError::Full)
    }

    /// Allocate and append `message` as the newest entry
    pub fn commit(&mut self, message: Message) -> Result<Handle, StoreError> {
        let node = self.allocate(message)?;
        Ok(self.push_newest(node))
    }

    /// Append a detached node at the tail
    pub fn push_newest(&mut self, node: Detached) -> Handle {
        let handle = node.handle;
        let old_tail = self.tail;

        match old_tail.and_then(|tail| self.pool.get_mut(tail)) {
            Some(tail) => tail.next = Some(handle),
            None => self.head = Some(handle),
        }
        if let Some(new) = self.pool.get_mut(handle) {
            new.prev = old_tail;
            new.next = None;
            new.linked = true;
        }

        self.tail = Some(handle);
        self.count += 1;
        handle
    }

    /// Prepend a detached node at the head
    pub fn push_oldest(&mut self, node: Detached) -> Handle {
        let handle = node.handle;
        let old_head = self.head;

        match old_head.and_then(|head| self.pool.get_mut(head)) {
            Some(head) => head.prev = Some(handle),
            None => self.tail = Some(handle),
        }
        if let Some(new) = self.pool.get_mut(handle) {
            new.prev = None;
            new.next = old_head;
            new.linked = true;
        }

        self.head = Some(handle);
        self.count += 1;
        handle
    }

    /// Unlink `handle` from the list
    ///
    /// Returns `None` if the store is empty or the handle is stale or not
    /// linked. Neighbors are re-linked; boundaries are updated when the
    /// node was the head and/or the tail.
    pub fn remove(&mut self, handle: Handle) -> Option<Detached> {
        let node = self.pool.get(handle).filter(|node| node.linked)?;
        let (prev, next) = (node.prev, node.next);

        match prev.and_then(|prev| self.pool.get_mut(prev)) {
            Some(before) => before.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.pool.get_mut(next)) {
            Some(after) => after.prev = prev,
            None => self.tail = prev,
        }
        if let Some(node) = self.pool.get_mut(handle) {
            node.prev = None;
            node.next = None;
            node.linked = false;
        }

        self.count -= 1;
        Some(Detached { handle })
    }

    /// Unlink the newest message
    pub fn pop_newest(&mut self) -> Option<Detached> {
        self.remove(self.tail?)
    }

    /// Unlink the oldest message
    pub fn pop_oldest(&mut self) -> Option<Detached> {
        self.remove(self.head?)
    }

    /// Free a detached node's block, returning its message
    pub fn release(&mut self, node: Detached) -> Message {
        self.pool
            .free(node.handle)
            .map(|node| node.message)
            .unwrap_or_default()
    }

    /// Message held by a detached node
    pub fn detached_message(&self, node: &Detached) -> Option<&Message> {
        self.pool.get(node.handle).map(|node| &node.message)
    }

    /// Unlink and free every message
    pub fn clear(&mut self) {
        while let Some(node) = self.pop_oldest() {
            self.release(node);
        }
    }

    fn linked(&self, handle: Handle) -> Option<&StoreNode> {
        self.pool.get(handle).filter(|node| node.linked)
    }

    /// Check if `handle` is a linked message
    pub fn contains(&self, handle: Handle) -> bool {
        self.linked(handle).is_some()
    }

    /// Message behind a linked handle
    pub fn get(&self, handle: Handle) -> Option<&Message> {
        self.linked(handle).map(|node| &node.message)
    }

    /// Next newer message
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        self.linked(handle)?.next
    }

    /// Next older message
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        self.linked(handle)?.prev
    }

    /// 1-based position counting from the oldest message
    pub fn position(&self, handle: Handle) -> Option<u32> {
        self.iter()
            .position(|(h, _)| h == handle)
            .map(|index| index as u32 + 1)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            store: self,
            cursor: self.head,
            forward: true,
        }
    }

    /// Iterate newest to oldest
    pub fn iter_rev(&self) -> Iter<'_, N> {
        Iter {
            store: self,
            cursor: self.tail,
            forward: false,
        }
    }
}

/// Walks the list following `next` or `prev` links
pub struct Iter<'a, const N: usize> {
    store: &'a MessageStore<N>,
    cursor: Option<Handle>,
    forward: bool,
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = (Handle, &'a Message);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.store.linked(handle)?;
        self.cursor = if self.forward { node.next } else { node.prev };
        Some((handle, &node.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    fn msg(text: &str) -> Message {
        Message::from_bytes(text.as_bytes()).unwrap()
    }

    fn texts<const N: usize>(store: &MessageStore<N>) -> Vec<std::string::String> {
        store.iter().map(|(_, m)| m.as_str().into()).collect()
    }

    #[test]
    fn test_push_newest_appends_at_tail() {
        let mut store: MessageStore<4> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        assert_eq!(store.head(), Some(a));
        assert_eq!(store.tail(), Some(a));

        let b = store.commit(msg("b")).unwrap();
        assert_eq!(store.head(), Some(a));
        assert_eq!(store.tail(), Some(b));
        assert_eq!(store.next(a), Some(b));
        assert_eq!(store.prev(b), Some(a));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_remove_sole_node_clears_boundaries() {
        let mut store: MessageStore<4> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        let node = store.remove(a).unwrap();
        assert_eq!(store.head(), None);
        assert_eq!(store.tail(), None);
        assert_eq!(store.count(), 0);
        assert_eq!(store.release(node).as_str(), "a");
        assert_eq!(store.blocks_in_use(), 0);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut store: MessageStore<4> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        let b = store.commit(msg("b")).unwrap();
        let c = store.commit(msg("c")).unwrap();

        let node = store.remove(a).unwrap();
        store.release(node);
        assert_eq!(store.head(), Some(b));
        assert_eq!(store.prev(b), None);

        let node = store.remove(c).unwrap();
        store.release(node);
        assert_eq!(store.tail(), Some(b));
        assert_eq!(store.next(b), None);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_middle_relinks_neighbors() {
        let mut store: MessageStore<4> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        let b = store.commit(msg("b")).unwrap();
        let c = store.commit(msg("c")).unwrap();

        let node = store.remove(b).unwrap();
        assert_eq!(store.next(a), Some(c));
        assert_eq!(store.prev(c), Some(a));
        assert_eq!(store.head(), Some(a));
        assert_eq!(store.tail(), Some(c));
        store.release(node);
        assert_eq!(texts(&store), ["a", "c"]);
    }

    #[test]
    fn test_remove_from_empty_or_twice_is_none() {
        let mut store: MessageStore<2> = MessageStore::new();
        assert!(store.pop_newest().is_none());
        assert!(store.pop_oldest().is_none());

        let a = store.commit(msg("a")).unwrap();
        let node = store.remove(a).unwrap();
        assert!(store.remove(a).is_none());
        store.release(node);
        assert!(store.remove(a).is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_detached_node_is_not_visible() {
        let mut store: MessageStore<2> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        let node = store.remove(a).unwrap();
        assert_eq!(store.get(a), None);
        assert_eq!(store.detached_message(&node).map(|m| m.as_str()), Some("a"));
        assert_eq!(store.blocks_in_use(), 1);
        let h = store.push_oldest(node);
        assert_eq!(store.get(h).map(|m| m.as_str()), Some("a"));
    }

    #[test]
    fn test_full_store_rejects_commit() {
        let mut store: MessageStore<2> = MessageStore::new();
        store.commit(msg("a")).unwrap();
        store.commit(msg("b")).unwrap();
        assert!(store.is_full());
        assert_eq!(store.commit(msg("c")), Err(StoreError::Full));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_push_oldest_prepends() {
        let mut store: MessageStore<3> = MessageStore::new();
        store.commit(msg("b")).unwrap();
        let node = store.allocate(msg("a")).unwrap();
        store.push_oldest(node);
        assert_eq!(texts(&store), ["a", "b"]);
        let rev: Vec<_> = store.iter_rev().map(|(_, m)| m.as_str()).collect();
        assert_eq!(rev, ["b", "a"]);
    }

    #[test]
    fn test_position_and_clear() {
        let mut store: MessageStore<3> = MessageStore::new();
        let a = store.commit(msg("a")).unwrap();
        let b = store.commit(msg("b")).unwrap();
        assert_eq!(store.position(a), Some(1));
        assert_eq!(store.position(b), Some(2));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.blocks_in_use(), 0);
        assert_eq!(store.position(a), None);
    }

    #[test]
    fn test_design_capacity_holds_a_thousand() {
        let mut store: std::boxed::Box<MessageStore<STORE_CAPACITY>> =
            std::boxed::Box::new(MessageStore::new());
        for i in 0..STORE_CAPACITY {
            let text = [b'a' + (i % 26) as u8];
            store.commit(Message::from_bytes(&text).unwrap()).unwrap();
        }
        assert_eq!(store.count() as usize, STORE_CAPACITY);
        assert_eq!(store.commit(msg("overflow")), Err(StoreError::Full));
    }

    #[derive(Debug, Clone)]
    enum Op {
        PushNewest,
        PushOldest,
        Remove(usize),
        PopNewest,
        PopOldest,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::PushNewest),
            1 => Just(Op::PushOldest),
            3 => (0usize..32).prop_map(Op::Remove),
            1 => Just(Op::PopNewest),
            1 => Just(Op::PopOldest),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_matches_both_walks(ops in proptest::collection::vec(op(), 0..150)) {
            const CAP: usize = 12;
            let mut store: MessageStore<CAP> = MessageStore::new();
            let mut model: VecDeque<(Handle, u8)> = VecDeque::new();
            let mut tag = 0u8;

            for op in ops {
                match op {
                    Op::PushNewest | Op::PushOldest => {
                        let message = Message::from_bytes(&[b'x']).unwrap().with_part_tag(tag);
                        match store.allocate(message) {
                            Ok(node) => {
                                if matches!(op, Op::PushNewest) {
                                    model.push_back((store.push_newest(node), tag));
                                } else {
                                    model.push_front((store.push_oldest(node), tag));
                                }
                                tag = tag.wrapping_add(1);
                            }
                            Err(StoreError::Full) => {
                                prop_assert_eq!(model.len(), CAP);
                            }
                        }
                    }
                    Op::Remove(i) if !model.is_empty() => {
                        let (handle, t) = model.remove(i % model.len()).unwrap();
                        let node = store.remove(handle).unwrap();
                        prop_assert_eq!(store.release(node).part_tag(), t);
                    }
                    Op::Remove(_) => {}
                    Op::PopNewest => {
                        let expected = model.pop_back();
                        let node = store.pop_newest();
                        prop_assert_eq!(node.is_some(), expected.is_some());
                        if let Some(node) = node {
                            store.release(node);
                        }
                    }
                    Op::PopOldest => {
                        let expected = model.pop_front();
                        let node = store.pop_oldest();
                        prop_assert_eq!(node.is_some(), expected.is_some());
                        if let Some(node) = node {
                            store.release(node);
                        }
                    }
                }

                let forward: Vec<u8> = store.iter().map(|(_, m)| m.part_tag()).collect();
                let mut backward: Vec<u8> = store.iter_rev().map(|(_, m)| m.part_tag()).collect();
                backward.reverse();
                let expected: Vec<u8> = model.iter().map(|(_, t)| *t).collect();

                prop_assert_eq!(store.count() as usize, forward.len());
                prop_assert_eq!(&forward, &backward);
                prop_assert_eq!(&forward, &expected);
                prop_assert_eq!(store.blocks_in_use(), model.len());
                prop_assert_eq!(store.count() == 0, store.head().is_none() && store.tail().is_none());
                if store.count() == 1 {
                    prop_assert_eq!(store.head(), store.tail());
                }
            }
        }
    }
}
