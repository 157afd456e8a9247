//! # Identifier Pool
//!
//! Hands out small integer ids from `[0, capacity)`, recycling freed ids
//! before minting new ones.

use crate::error::{EcsError, EcsResult, IdKind};

/// A recycling allocator for integer identifiers.
///
/// Freed ids go on a LIFO free list, so releasing an id and allocating
/// again with nothing in between returns the same id. New ids are minted
/// in increasing order only when the free list is empty.
///
/// # Example
///
/// ```rust
/// use tessera_core::storage::IdPool;
/// use tessera_core::IdKind;
///
/// let mut pool = IdPool::new(IdKind::Entity, 2);
/// let a = pool.allocate().unwrap();
/// pool.release(a).unwrap();
/// assert_eq!(pool.allocate().unwrap(), a);
/// ```
#[derive(Debug)]
pub struct IdPool {
    /// Domain, for error reporting.
    kind: IdKind,
    /// Number of ids the pool owns.
    capacity: u32,
    /// Next never-used id.
    next: u32,
    /// Released ids awaiting reuse.
    free_list: Vec<u32>,
    /// Liveness of every minted id (`live[id]`).
    live: Vec<bool>,
}

impl IdPool {
    /// Creates an empty pool owning ids `0..capacity`.
    #[must_use]
    pub const fn new(kind: IdKind, capacity: u32) -> Self {
        Self {
            kind,
            capacity,
            next: 0,
            free_list: Vec::new(),
            live: Vec::new(),
        }
    }

    /// Returns the pool's domain.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> IdKind {
        self.kind
    }

    /// Returns the number of ids the pool owns.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of ids currently handed out.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> u32 {
        self.next - self.free_list.len() as u32
    }

    /// Returns `true` if `id` is currently handed out.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: u32) -> bool {
        self.live.get(id as usize).copied().unwrap_or(false)
    }

    /// Hands out an id, preferring the most recently released one.
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExhausted`] once every id is live.
    pub fn allocate(&mut self) -> EcsResult<u32> {
        if let Some(id) = self.free_list.pop() {
            self.live[id as usize] = true;
            return Ok(id);
        }

        if self.next >= self.capacity {
            return Err(EcsError::CapacityExhausted {
                kind: self.kind,
                capacity: self.capacity,
            });
        }

        let id = self.next;
        self.next += 1;
        self.live.push(true);
        Ok(id)
    }

    /// Returns an id to the pool.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidId`] if `id` is not currently handed out.
    pub fn release(&mut self, id: u32) -> EcsResult<()> {
        match self.live.get_mut(id as usize) {
            Some(live) if *live => {
                *live = false;
                self.free_list.push(id);
                Ok(())
            }
            _ => Err(EcsError::InvalidId {
                kind: self.kind,
                id,
            }),
        }
    }

    /// Releases every id at once.
    pub fn clear(&mut self) {
        self.next = 0;
        self.free_list.clear();
        self.live.clear();
    }
}
