//! Ring-scoped operations.
//!
//! Methods on [`HeadKey`] act on the ring the head defines: emptiness and
//! openness, counting, insertion and removal at the front or end, and
//! whole-ring rewrites (open/close, rotate, reverse, sort, clear).
//!
//! # Example
//!
//! ```
//! use multiring::BoxedRingStorage;
//!
//! let mut store: BoxedRingStorage<u32> = BoxedRingStorage::with_capacity(1, 8);
//! let ring = store.try_new_head().unwrap();
//! let nodes: Vec<_> = [3, 1, 2]
//!     .into_iter()
//!     .map(|v| store.try_new_data(v).unwrap())
//!     .collect();
//!
//! ring.extend(&mut store, nodes);
//! ring.sort(&mut store);
//!
//! let values: Vec<_> = ring.iter(&store).map(|k| *k.value(&store)).collect();
//! assert_eq!(values, [1, 2, 3]);
//! assert_eq!(ring.is_open(&store), Some(false));
//! ```

use core::cmp::Ordering;

use tracing::trace;

use crate::data::{ascend, chain, relink, step_within};
use crate::{DataKey, DocIter, HeadKey, Key, NodeRef, NodeStore, RingIter};

/// Next data node in a ring being relinked by [`HeadKey::sort_by`].
///
/// Anything that is not a data link ends the run.
#[inline]
fn next_data<S: NodeStore>(store: &S, node: DataKey<S::Key>) -> Option<DataKey<S::Key>> {
    store.data(node).next.and_then(NodeRef::as_data)
}

impl<K: Key> HeadKey<K> {
    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns `true` if the ring has no data nodes.
    #[inline]
    pub fn is_empty<S: NodeStore<Key = K>>(self, store: &S) -> bool {
        store.head(self).first.is_none()
    }

    /// Returns `true` if this head is not attached below any data node.
    #[inline]
    pub fn is_root<S: NodeStore<Key = K>>(self, store: &S) -> bool {
        store.head(self).link_above.is_none()
    }

    /// Whether the ring is open (its last node has no `next`).
    ///
    /// `None` for an empty ring, which is neither.
    pub fn is_open<S: NodeStore<Key = K>>(self, store: &S) -> Option<bool> {
        let last = self.find_last(store)?;
        Some(store.data(last).next.is_none())
    }

    /// Number of data nodes in this ring.
    pub fn count<S: NodeStore<Key = K>>(self, store: &S) -> usize {
        self.step(store).map_or(0, |first| 1 + first.count_after(store))
    }

    /// Number of data nodes that follow this ring in document order.
    pub fn count_above<S: NodeStore<Key = K>>(self, store: &S) -> usize {
        self.step_above(store)
            .map_or(0, |next| 1 + next.count_after_z(store))
    }

    /// Number of data nodes in this ring and in every ring nested below it.
    pub fn count_below<S: NodeStore<Key = K>>(self, store: &S) -> usize {
        let Some(mut cur) = self.step(store) else {
            return 0;
        };
        let mut count = 1;
        let mut depth = 0;
        while let Some(next) = step_within(store, cur, &mut depth) {
            count += 1;
            cur = next;
        }
        count
    }

    /// Last data node of this ring.
    pub fn find_last<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        self.step(store).map(|first| first.find_last(store))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// First data node of this ring.
    #[inline]
    pub fn step<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        store.head(self).first
    }

    /// First data node after this ring in an enclosing ring.
    ///
    /// Climbs through as many exhausted rings as needed; `None` if nothing
    /// follows this ring in the multiring.
    #[inline]
    pub fn step_above<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        ascend(store, store.head(self).link_above)
    }

    /// First data node in document order starting from this head.
    ///
    /// The ring's own first node, or for an empty ring whatever follows it.
    #[inline]
    pub fn step_z<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        self.step(store).or_else(|| self.step_above(store))
    }

    // ========================================================================
    // Insertion / removal
    // ========================================================================

    /// Links `node` at the front of the ring.
    ///
    /// `node` must not be linked into any ring. Inserting into an empty ring
    /// produces a closed ring.
    pub fn insert_after<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) {
        let next = match store.head(self).first {
            Some(first) => NodeRef::Data(first),
            None => NodeRef::Head(self),
        };
        relink(store, node, Some(next));
        store.head_mut(self).first = Some(node);
    }

    /// Links `nodes` at the front of the ring, keeping their order.
    ///
    /// An empty sequence is a no-op.
    pub fn insert_many_after<S, I>(self, store: &mut S, nodes: I)
    where
        S: NodeStore<Key = K>,
        I: IntoIterator<Item = DataKey<K>>,
    {
        if let Some((first, last)) = chain(store, nodes) {
            let next = match store.head(self).first {
                Some(old) => NodeRef::Data(old),
                None => NodeRef::Head(self),
            };
            relink(store, last, Some(next));
            store.head_mut(self).first = Some(first);
        }
    }

    /// Links `node` at the end of the ring.
    pub fn append<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) {
        match self.find_last(store) {
            Some(last) => last.insert_after(store, node),
            None => self.insert_after(store, node),
        }
    }

    /// Links `nodes` at the end of the ring, keeping their order.
    pub fn extend<S, I>(self, store: &mut S, nodes: I)
    where
        S: NodeStore<Key = K>,
        I: IntoIterator<Item = DataKey<K>>,
    {
        match self.find_last(store) {
            Some(last) => last.insert_many_after(store, nodes),
            None => self.insert_many_after(store, nodes),
        }
    }

    /// Unlinks and returns the first data node.
    pub fn pop_next<S: NodeStore<Key = K>>(self, store: &mut S) -> Option<DataKey<K>> {
        let first = self.step(store)?;
        let second = first.step(store);
        store.head_mut(self).first = second;
        relink(store, first, None);
        Some(first)
    }

    /// Unlinks `node` from this ring.
    ///
    /// Returns `false` if `node` is not in the ring.
    pub fn remove<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        match self.step(store) {
            Some(first) if first == node => {
                self.pop_next(store);
                true
            }
            Some(first) => first.remove_after(store, node),
            None => false,
        }
    }

    /// Unlinks `node` if it follows this ring in document order.
    ///
    /// Returns `false` if `node` was not found.
    pub fn remove_above<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        let Some(start) = self.step_above(store) else {
            return false;
        };
        if start != node {
            return start.remove_after_z(store, node);
        }
        match node.find_head(store) {
            Some(ring) => ring.remove(store, node),
            None => false,
        }
    }

    /// Unlinks `node` from this ring or from any ring nested below it.
    ///
    /// Returns `false` if `node` was not found.
    pub fn remove_below<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        let Some(mut cur) = self.step(store) else {
            return false;
        };
        if cur == node {
            self.pop_next(store);
            return true;
        }

        let mut depth = 0;
        loop {
            if let Some(subring) = store.data(cur).subring {
                if store.head(subring).first == Some(node) {
                    subring.pop_next(store);
                    return true;
                }
            }
            if cur.step(store) == Some(node) {
                cur.pop_next(store);
                return true;
            }
            match step_within(store, cur, &mut depth) {
                Some(next) => cur = next,
                None => return false,
            }
        }
    }

    // ========================================================================
    // Whole-ring rewrites
    // ========================================================================

    /// Opens the ring: its last node stops linking back to the head.
    ///
    /// Returns `false` (and does nothing) if the ring is empty or already
    /// open.
    pub fn open<S: NodeStore<Key = K>>(self, store: &mut S) -> bool {
        let Some(last) = self.find_last(store) else {
            return false;
        };
        if store.data(last).next.is_none() {
            return false;
        }
        relink(store, last, None);
        true
    }

    /// Closes the ring: its last node links back to the head.
    ///
    /// Returns `false` (and does nothing) if the ring is empty or already
    /// closed.
    pub fn close<S: NodeStore<Key = K>>(self, store: &mut S) -> bool {
        let Some(last) = self.find_last(store) else {
            return false;
        };
        if store.data(last).next.is_some() {
            return false;
        }
        relink(store, last, Some(NodeRef::Head(self)));
        true
    }

    /// Moves the first data node to the end of the ring.
    ///
    /// No-op for rings with fewer than two nodes.
    pub fn rotate<S: NodeStore<Key = K>>(self, store: &mut S) {
        let Some(first) = self.step(store) else {
            return;
        };
        let Some(second) = first.step(store) else {
            return;
        };
        let last = second.find_last(store);
        let terminator = store.data(last).next;

        store.head_mut(self).first = Some(second);
        relink(store, last, Some(NodeRef::Data(first)));
        relink(store, first, terminator);
    }

    /// Reverses the order of the data nodes in this ring.
    ///
    /// Subrings stay attached to their nodes and are not reversed themselves.
    /// Open rings stay open.
    pub fn reverse<S: NodeStore<Key = K>>(self, store: &mut S) {
        let Some(mut cur) = self.step(store) else {
            return;
        };
        let mut prev = store.data(cur.find_last(store)).next;
        loop {
            let next = cur.step(store);
            relink(store, cur, prev);
            prev = Some(NodeRef::Data(cur));
            match next {
                Some(next) => cur = next,
                None => break,
            }
        }
        store.head_mut(self).first = Some(cur);
    }

    /// Sorts the ring by `cmp`.
    ///
    /// Bottom-up merge sort over the links: stable, O(n log n) comparisons,
    /// no allocation. Subrings move with their nodes. Open rings stay open.
    pub fn sort_by<S, F>(self, store: &mut S, mut cmp: F)
    where
        S: NodeStore<Key = K>,
        F: FnMut(&S::Value, &S::Value) -> Ordering,
    {
        let Some(mut list) = self.step(store) else {
            return;
        };
        let terminator = store.data(list.find_last(store)).next;

        // Merge passes write `next` directly; links are made consistent
        // (terminator, subring mirrors) once the order is final.
        let mut width = 1usize;
        let mut passes = 0usize;
        loop {
            let mut p = Some(list);
            let mut merged: Option<DataKey<K>> = None;
            let mut tail: Option<DataKey<K>> = None;
            let mut merges = 0usize;

            while let Some(start) = p {
                merges += 1;

                let mut q = Some(start);
                let mut psize = 0;
                while let Some(k) = q {
                    if psize == width {
                        break;
                    }
                    psize += 1;
                    q = next_data(store, k);
                }
                let mut qsize = width;

                loop {
                    let left = if psize > 0 { p } else { None };
                    let right = if qsize > 0 { q } else { None };
                    let take = match (left, right) {
                        (None, None) => break,
                        (Some(l), Some(r))
                            if cmp(store.data(l).value(), store.data(r).value())
                                == Ordering::Greater =>
                        {
                            q = next_data(store, r);
                            qsize -= 1;
                            r
                        }
                        (Some(l), _) => {
                            p = next_data(store, l);
                            psize -= 1;
                            l
                        }
                        (None, Some(r)) => {
                            q = next_data(store, r);
                            qsize -= 1;
                            r
                        }
                    };
                    match tail {
                        Some(t) => store.data_mut(t).next = Some(NodeRef::Data(take)),
                        None => merged = Some(take),
                    }
                    tail = Some(take);
                }

                p = q;
            }

            if let Some(t) = tail {
                store.data_mut(t).next = None;
            }
            if let Some(m) = merged {
                list = m;
            }
            passes += 1;

            if merges <= 1 {
                break;
            }
            width *= 2;
        }

        store.head_mut(self).first = Some(list);
        let mut cur = list;
        loop {
            let next = store.data(cur).next;
            match next {
                Some(NodeRef::Data(n)) => {
                    relink(store, cur, next);
                    cur = n;
                }
                _ => {
                    relink(store, cur, terminator);
                    break;
                }
            }
        }
        trace!(ring = ?self, passes, "ring sorted");
    }

    /// Sorts the ring in ascending order. See [`sort_by`](Self::sort_by).
    pub fn sort<S>(self, store: &mut S)
    where
        S: NodeStore<Key = K>,
        S::Value: Ord,
    {
        self.sort_by(store, |a, b| a.cmp(b));
    }

    /// Unlinks every data node of this ring, leaving it empty.
    ///
    /// Nodes keep their own subrings; nested rings are not touched.
    pub fn clear<S: NodeStore<Key = K>>(self, store: &mut S) {
        let mut cur = store.head_mut(self).first.take();
        while let Some(node) = cur {
            cur = node.step(store);
            relink(store, node, None);
        }
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterates over the data nodes of this ring.
    #[inline]
    pub fn iter<S: NodeStore<Key = K>>(self, store: &S) -> RingIter<'_, S> {
        RingIter::new(store, self.step(store))
    }

    /// Iterates in document order over this ring and everything nested
    /// below it.
    #[inline]
    pub fn iter_below<S: NodeStore<Key = K>>(self, store: &S) -> DocIter<'_, S> {
        DocIter::new(store, self.step(store))
    }
}
