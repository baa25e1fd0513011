//! Capacity-bounded entity pool with a free-list
//!
//! Slots are created lazily up to `capacity` and recycled through the
//! free-list afterwards, so steady-state spawning does not allocate.
//! Every slot is either active or on the free-list, which keeps
//! `active + free == slots <= capacity` unless the pool may expand.
//! Releasing bumps the slot generation, invalidating stale [`Handle`]s.

/// Generation-checked reference to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    item: T,
    generation: u32,
    active: bool,
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    capacity: usize,
    expandable: bool,
}

impl<T: Default> Pool<T> {
    pub fn new(capacity: usize, expandable: bool) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
            expandable,
        }
    }

    /// Claim a slot, reusing a freed one when available.
    ///
    /// The returned item may hold state from its previous life; callers must
    /// fully re-initialise it. Returns `None` when the pool is full.
    pub fn acquire(&mut self) -> Option<(Handle, &mut T)> {
        let index = if let Some(index) = self.free.pop() {
            index
        } else if self.slots.len() < self.capacity || self.expandable {
            self.slots.push(Slot {
                item: T::default(),
                generation: 0,
                active: false,
            });
            (self.slots.len() - 1) as u32
        } else {
            return None;
        };

        let slot = &mut self.slots[index as usize];
        slot.active = true;
        let handle = Handle {
            index,
            generation: slot.generation,
        };
        Some((handle, &mut slot.item))
    }

    /// Return a slot to the free-list. Stale or already-free handles are ignored.
    pub fn release(&mut self, handle: Handle) -> bool {
        match self.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.active && slot.generation == handle.generation => {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(handle.index);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &s.item)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &mut s.item)
    }

    /// Active items in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(i, s)| {
            (
                Handle {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.item,
            )
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.item,
                )
            })
    }

    /// Handles of all active items matching `pred`
    pub fn handles_where(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<Handle> {
        self.iter()
            .filter(|(_, item)| pred(item))
            .map(|(h, _)| h)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total slots ever created (active + free)
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Rock {
        size: u32,
    }

    #[test]
    fn test_acquire_until_full() {
        let mut pool: Pool<Rock> = Pool::new(2, false);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_release_recycles_slot_without_allocating() {
        let mut pool: Pool<Rock> = Pool::new(2, false);
        let (h1, rock) = pool.acquire().expect("slot");
        rock.size = 7;
        assert!(pool.release(h1));
        assert_eq!(pool.free_count(), 1);

        let (h2, rock) = pool.acquire().expect("recycled slot");
        assert_eq!(h2.index, h1.index);
        assert_ne!(h2.generation, h1.generation);
        // Recycled items keep their old state until re-initialised
        assert_eq!(rock.size, 7);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut pool: Pool<Rock> = Pool::new(4, false);
        let (h1, _) = pool.acquire().expect("slot");
        pool.release(h1);
        let (h2, _) = pool.acquire().expect("slot");

        assert!(pool.get(h1).is_none());
        assert!(pool.get(h2).is_some());
        // Double release and stale release are no-ops
        assert!(!pool.release(h1));
        assert!(pool.release(h2));
        assert!(!pool.release(h2));
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_active_plus_free_never_exceeds_capacity() {
        let mut pool: Pool<Rock> = Pool::new(3, false);
        let mut live = Vec::new();
        for round in 0..20 {
            if round % 3 == 2 {
                if let Some(h) = live.pop() {
                    pool.release(h);
                }
            } else if let Some((h, _)) = pool.acquire() {
                live.push(h);
            }
            assert!(pool.active_count() + pool.free_count() <= pool.capacity());
        }
    }

    #[test]
    fn test_expandable_pool_grows() {
        let mut pool: Pool<Rock> = Pool::new(1, true);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_handles_where_filters_active() {
        let mut pool: Pool<Rock> = Pool::new(4, false);
        for size in 0..4 {
            let (_, rock) = pool.acquire().expect("slot");
            rock.size = size;
        }
        let big = pool.handles_where(|r| r.size >= 2);
        assert_eq!(big.len(), 2);
        pool.release(big[0]);
        assert_eq!(pool.handles_where(|r| r.size >= 2).len(), 1);
    }
}
