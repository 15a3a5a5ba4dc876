//! Slot storage with stable keys.
//!
//! Storage owns node memory and hands out keys that stay valid until the
//! slot is removed. The multiring core never allocates: it only reads and
//! rewrites links of nodes that already live in a storage.
//!
//! ```text
//! Storage<T>              - base trait: get, remove, len
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert -> Result
//!     │
//!     └── UnboundedStorage<T> - growable, insert -> Key (infallible)
//! ```

use core::mem::MaybeUninit;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** remove and get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage with a fixed number of slots.
pub trait BoundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot is free.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Returns the total number of slots.
    fn capacity(&self) -> usize;
}

/// Storage that grows on demand.
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its key.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - runtime capacity, allocated once, bitmap occupancy
// =============================================================================

/// Fixed-capacity storage with runtime-determined size.
///
/// All memory is allocated up front by [`with_capacity`](Self::with_capacity):
/// - Slot array (`MaybeUninit<T>`)
/// - Occupancy bitmap (`u64` words)
/// - Free stack (keys)
///
/// Capacity is rounded up to the next power of 2.
///
/// # Example
///
/// ```
/// use multiring::{BoundedStorage, BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(1000);
/// assert_eq!(storage.capacity(), 1024);
///
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// ```
pub struct BoxedStorage<T, K: Key = u32> {
    slots: Box<[MaybeUninit<T>]>,
    occupied: Box<[u64]>,
    free: Box<[K]>,
    /// Number of entries at the bottom of `free` that are live.
    free_len: usize,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with at least `min_capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `min_capacity` is 0 or exceeds the key type's maximum.
    pub fn with_capacity(min_capacity: usize) -> Self {
        assert!(min_capacity > 0, "capacity must be > 0");

        let capacity = min_capacity.next_power_of_two();
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        let slots = (0..capacity).map(|_| MaybeUninit::uninit()).collect();
        let occupied = vec![0u64; capacity.div_ceil(64)].into_boxed_slice();
        // Lowest keys on top of the stack so fresh storage hands out 0, 1, 2, ...
        let free = (0..capacity).rev().map(K::from_usize).collect();

        Self {
            slots,
            occupied,
            free,
            free_len: capacity,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.capacity() - self.free_len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free_len == self.capacity()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_len == 0
    }

    /// Drops every stored value and makes all slots available again.
    ///
    /// Any multiring still referencing keys in this storage is left with
    /// dangling links. Only call this once nothing references the storage.
    pub fn clear(&mut self) {
        for i in 0..self.capacity() {
            if self.is_occupied(i) {
                // Safety: slot is occupied
                unsafe { self.slots[i].assume_init_drop() };
            }
        }
        self.occupied.fill(0);

        let capacity = self.capacity();
        for (slot, key) in self.free.iter_mut().zip((0..capacity).rev()) {
            *slot = K::from_usize(key);
        }
        self.free_len = capacity;
    }

    #[inline]
    fn is_occupied(&self, idx: usize) -> bool {
        self.occupied[idx / 64] & (1 << (idx % 64)) != 0
    }

    #[inline]
    fn set_occupied(&mut self, idx: usize) {
        self.occupied[idx / 64] |= 1 << (idx % 64);
    }

    #[inline]
    fn set_vacant(&mut self, idx: usize) {
        self.occupied[idx / 64] &= !(1 << (idx % 64));
    }

    #[inline]
    fn slot_in_use(&self, key: K) -> Option<usize> {
        let i = key.as_usize();
        (i < self.capacity() && self.is_occupied(i)).then_some(i)
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let i = self.slot_in_use(key)?;

        self.set_vacant(i);
        // Safety: slot was occupied, and is now marked vacant so it is read once
        let value = unsafe { self.slots[i].assume_init_read() };

        self.free[self.free_len] = key;
        self.free_len += 1;

        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        let i = self.slot_in_use(key)?;
        // Safety: slot is occupied
        Some(unsafe { self.slots[i].assume_init_ref() })
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let i = self.slot_in_use(key)?;
        // Safety: slot is occupied
        Some(unsafe { self.slots[i].assume_init_mut() })
    }

    #[inline]
    fn len(&self) -> usize {
        BoxedStorage::len(self)
    }
}

impl<T, K: Key> BoundedStorage<T> for BoxedStorage<T, K> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_len == 0 {
            return Err(Full(value));
        }

        self.free_len -= 1;
        let key = self.free[self.free_len];
        let i = key.as_usize();

        self.slots[i].write(value);
        self.set_occupied(i);

        Ok(key)
    }

    #[inline]
    fn capacity(&self) -> usize {
        BoxedStorage::capacity(self)
    }
}

impl<T, K: Key> Drop for BoxedStorage<T, K> {
    fn drop(&mut self) {
        for i in 0..self.capacity() {
            if self.is_occupied(i) {
                // Safety: slot is occupied
                unsafe { self.slots[i].assume_init_drop() };
            }
        }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

#[cfg(feature = "slab")]
impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        slab::Slab::insert(self, value)
    }
}
