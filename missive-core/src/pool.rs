//! Fixed-capacity block pool
//!
//! An arena of `N` equally sized slots with an intrusive free-list. It
//! replaces heap allocation for message storage: allocation and release are
//! O(1), never block, and never touch a general-purpose allocator.
//!
//! Slots are addressed through [`Handle`]s carrying a generation counter.
//! Releasing a slot bumps its generation, so every handle to the old
//! occupant becomes stale: lookups through it return `None` and freeing it
//! again is a no-op. Reuse of a slot can never be observed through an old
//! handle.
//!
//! Slots that have never been used are handed out from a watermark instead
//! of being pre-threaded onto the free-list, which keeps [`BlockPool::new`]
//! a `const fn` so the pool can sit in a `static`.

/// Stable, generation-checked reference to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handle {
    index: u16,
    generation: u32,
}

impl Handle {
    /// Slot index inside the pool
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation the slot had when this handle was issued
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

enum Entry<T> {
    Occupied(T),
    Vacant { next_free: Option<u16> },
}

struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

impl<T> Slot<T> {
    const VACANT: Self = Self {
        generation: 0,
        entry: Entry::Vacant { next_free: None },
    };
}

/// Fixed-capacity arena of `N` blocks of `T`
pub struct BlockPool<T, const N: usize> {
    slots: [Slot<T>; N],
    /// Most recently released slot
    free_head: Option<u16>,
    /// Slots at or above this index have never been allocated
    watermark: u16,
    live: usize,
}

impl<T, const N: usize> Default for BlockPool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BlockPool<T, N> {
    /// Create an empty pool
    pub const fn new() -> Self {
        assert!(N <= u16::MAX as usize, "pool capacity exceeds u16 index");
        Self {
            slots: [const { Slot::<T>::VACANT }; N],
            free_head: None,
            watermark: 0,
            live: 0,
        }
    }

    /// Total number of blocks
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of allocated blocks
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of blocks still available
    pub fn available(&self) -> usize {
        N - self.live
    }

    /// Check if no block is available
    pub fn is_full(&self) -> bool {
        self.live == N
    }

    /// Check if no block is allocated
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Move `value` into a free block
    ///
    /// Hands `value` back if the pool is exhausted.
    pub fn alloc(&mut self, value: T) -> Result<Handle, T> {
        let index = match self.free_head {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                match slot.entry {
                    Entry::Vacant { next_free } => self.free_head = next_free,
                    // A free-list entry is always vacant
                    Entry::Occupied(_) => return Err(value),
                }
                index
            }
            None if (self.watermark as usize) < N => {
                let index = self.watermark;
                self.watermark += 1;
                index
            }
            None => return Err(value),
        };

        let slot = &mut self.slots[index as usize];
        slot.entry = Entry::Occupied(value);
        self.live += 1;

        Ok(Handle {
            index,
            generation: slot.generation,
        })
    }

    /// Release the block behind `handle`, returning its contents
    ///
    /// Returns `None` and changes nothing if the handle is stale.
    pub fn free(&mut self, handle: Handle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }

        let slot = &mut self.slots[handle.index()];
        let entry = core::mem::replace(
            &mut slot.entry,
            Entry::Vacant {
                next_free: self.free_head,
            },
        );
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = Some(handle.index);
        self.live -= 1;

        match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    /// Check if `handle` still refers to a live block
    pub fn contains(&self, handle: Handle) -> bool {
        match self.slots.get(handle.index()) {
            Some(slot) => {
                slot.generation == handle.generation && matches!(slot.entry, Entry::Occupied(_))
            }
            None => false,
        }
    }

    /// Borrow the block behind `handle`
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index())?;
        match &slot.entry {
            Entry::Occupied(value) if slot.generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Mutably borrow the block behind `handle`
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index())?;
        match &mut slot.entry {
            Entry::Occupied(value) if slot.generation == handle.generation => Some(value),
            _ => None,
        }
    }
}
