//! Node stores: where heads and data nodes live.
//!
//! [`NodeStore`] is the only way the core touches nodes. [`RingStorage`]
//! implements it over a pair of slot storages, one for heads and one for data
//! nodes, so any [`Storage`] backend can hold a multiring.
//!
//! # Critical Invariant: Same Store Instance
//!
//! Keys are plain indices. All operations on a multiring must use the store
//! its nodes were created in. Passing another store reads unrelated slots
//! (or panics on vacant ones).
//!
//! # Example
//!
//! ```
//! use multiring::BoxedRingStorage;
//!
//! let mut store: BoxedRingStorage<&str> = BoxedRingStorage::with_capacity(4, 16);
//!
//! let ring = store.try_new_head().unwrap();
//! let a = store.try_new_data("a").unwrap();
//! ring.append(&mut store, a);
//!
//! assert_eq!(store.get(a), Some(&"a"));
//! assert_eq!(ring.count(&store), 1);
//! ```

use std::marker::PhantomData;

use crate::{
    BoundedStorage, BoxedStorage, DataKey, DataNode, Full, HeadKey, HeadNode, Key, Storage,
    UnboundedStorage,
};

/// Link access to heads and data nodes.
///
/// Lookups panic on keys that do not name an occupied slot of the right
/// kind; the core only passes keys it found in links or received from the
/// caller.
pub trait NodeStore {
    /// Raw key type shared by heads and data nodes.
    type Key: Key;

    /// Payload type of data nodes.
    type Value;

    /// Returns the head node behind `key`.
    fn head(&self, key: HeadKey<Self::Key>) -> &HeadNode<Self::Key>;

    /// Returns the head node behind `key`, mutably.
    fn head_mut(&mut self, key: HeadKey<Self::Key>) -> &mut HeadNode<Self::Key>;

    /// Returns the data node behind `key`.
    fn data(&self, key: DataKey<Self::Key>) -> &DataNode<Self::Value, Self::Key>;

    /// Returns the data node behind `key`, mutably.
    fn data_mut(&mut self, key: DataKey<Self::Key>) -> &mut DataNode<Self::Value, Self::Key>;
}

/// Type alias for bounded ring storage backed by boxed allocations.
pub type BoxedRingStorage<V, K = u32> =
    RingStorage<V, K, BoxedStorage<HeadNode<K>, K>, BoxedStorage<DataNode<V, K>, K>>;

/// Type alias for unbounded ring storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabRingStorage<V> =
    RingStorage<V, usize, slab::Slab<HeadNode<usize>>, slab::Slab<DataNode<V, usize>>>;

/// Heads and data nodes held in two slot storages.
///
/// # Type Parameters
///
/// - `V`: payload type of data nodes
/// - `K`: raw key type (default `u32`)
/// - `HS`: storage for [`HeadNode`]s
/// - `DS`: storage for [`DataNode`]s
pub struct RingStorage<V, K, HS, DS> {
    heads: HS,
    data: DS,
    _marker: PhantomData<(V, K)>,
}

impl<V, K: Key> BoxedRingStorage<V, K> {
    /// Creates storage for at least `heads` rings and `data` data nodes.
    ///
    /// Both capacities are rounded up to the next power of 2.
    ///
    /// # Panics
    ///
    /// Panics if either capacity is 0 or exceeds the key type's maximum.
    pub fn with_capacity(heads: usize, data: usize) -> Self {
        Self::from_parts(BoxedStorage::with_capacity(heads), BoxedStorage::with_capacity(data))
    }
}

impl<V, K, HS, DS> RingStorage<V, K, HS, DS>
where
    K: Key,
    HS: Storage<HeadNode<K>, Key = K>,
    DS: Storage<DataNode<V, K>, Key = K>,
{
    /// Builds a store from existing head and data storages.
    ///
    /// Both storages should be empty: keys already handed out by them are not
    /// known to any ring.
    pub fn from_parts(heads: HS, data: DS) -> Self {
        Self {
            heads,
            data,
            _marker: PhantomData,
        }
    }

    /// Splits the store back into its head and data storages.
    pub fn into_parts(self) -> (HS, DS) {
        (self.heads, self.data)
    }

    /// Number of allocated heads.
    #[inline]
    pub fn head_count(&self) -> usize {
        self.heads.len()
    }

    /// Number of allocated data nodes.
    #[inline]
    pub fn data_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the head behind `key`, or `None` if the slot is vacant.
    #[inline]
    pub fn head_node(&self, key: HeadKey<K>) -> Option<&HeadNode<K>> {
        self.heads.get(key.raw())
    }

    /// Returns the data node behind `key`, or `None` if the slot is vacant.
    #[inline]
    pub fn data_node(&self, key: DataKey<K>) -> Option<&DataNode<V, K>> {
        self.data.get(key.raw())
    }

    /// Returns the payload of `key`.
    #[inline]
    pub fn get(&self, key: DataKey<K>) -> Option<&V> {
        self.data_node(key).map(DataNode::value)
    }

    /// Returns the payload of `key`, mutably.
    #[inline]
    pub fn get_mut(&mut self, key: DataKey<K>) -> Option<&mut V> {
        self.data.get_mut(key.raw()).map(DataNode::value_mut)
    }

    /// Frees a head slot.
    ///
    /// The head must be unlinked: not attached below a data node, not a
    /// multiring root still in use, and empty (or its nodes abandoned).
    /// Returns `false` if the slot was already vacant.
    pub fn remove_head(&mut self, key: HeadKey<K>) -> bool {
        self.heads.remove(key.raw()).is_some()
    }

    /// Frees a data slot, returning its payload.
    ///
    /// The node must be unlinked: removed from its ring, and with no subring
    /// the caller still needs (the subring head is not freed).
    pub fn remove_data(&mut self, key: DataKey<K>) -> Option<V> {
        self.data.remove(key.raw()).map(DataNode::into_value)
    }
}

// =============================================================================
// Bounded storage impl - fallible node creation
// =============================================================================

impl<V, K, HS, DS> RingStorage<V, K, HS, DS>
where
    K: Key,
    HS: BoundedStorage<HeadNode<K>, Key = K>,
    DS: BoundedStorage<DataNode<V, K>, Key = K>,
{
    /// Creates an unlinked, empty head.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(()))` if the head storage is full.
    pub fn try_new_head(&mut self) -> Result<HeadKey<K>, Full<()>> {
        self.heads
            .try_insert(HeadNode::new())
            .map(HeadKey::from_raw)
            .map_err(|_| Full(()))
    }

    /// Creates an unlinked data node holding `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the data storage is full.
    pub fn try_new_data(&mut self, value: V) -> Result<DataKey<K>, Full<V>> {
        self.data
            .try_insert(DataNode::new(value))
            .map(DataKey::from_raw)
            .map_err(|e| Full(e.0.into_value()))
    }
}

// =============================================================================
// Unbounded storage impl - infallible node creation
// =============================================================================

impl<V, K, HS, DS> RingStorage<V, K, HS, DS>
where
    K: Key,
    HS: UnboundedStorage<HeadNode<K>, Key = K>,
    DS: UnboundedStorage<DataNode<V, K>, Key = K>,
{
    /// Creates an unlinked, empty head.
    pub fn new_head(&mut self) -> HeadKey<K> {
        HeadKey::from_raw(self.heads.insert(HeadNode::new()))
    }

    /// Creates an unlinked data node holding `value`.
    pub fn new_data(&mut self, value: V) -> DataKey<K> {
        DataKey::from_raw(self.data.insert(DataNode::new(value)))
    }
}

impl<V, K, HS, DS> NodeStore for RingStorage<V, K, HS, DS>
where
    K: Key,
    HS: Storage<HeadNode<K>, Key = K>,
    DS: Storage<DataNode<V, K>, Key = K>,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn head(&self, key: HeadKey<K>) -> &HeadNode<K> {
        self.heads.get(key.raw()).expect("invalid head key")
    }

    #[inline]
    fn head_mut(&mut self, key: HeadKey<K>) -> &mut HeadNode<K> {
        self.heads.get_mut(key.raw()).expect("invalid head key")
    }

    #[inline]
    fn data(&self, key: DataKey<K>) -> &DataNode<V, K> {
        self.data.get(key.raw()).expect("invalid data key")
    }

    #[inline]
    fn data_mut(&mut self, key: DataKey<K>) -> &mut DataNode<V, K> {
        self.data.get_mut(key.raw()).expect("invalid data key")
    }
}
