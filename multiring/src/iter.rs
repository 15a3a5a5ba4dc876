//! Borrowing iterators.
//!
//! Iterators hold a shared borrow of the store, so the structure cannot change
//! while one is alive. They yield keys; read payloads through
//! [`DataKey::value`] or use [`Values`].

use core::iter::FusedIterator;

use crate::data::step_within;
use crate::{DataKey, NodeStore};

// =============================================================================
// RingIter
// =============================================================================

/// Iterator over the data nodes of a single ring.
///
/// Created by [`HeadKey::iter`](crate::HeadKey::iter).
pub struct RingIter<'a, S: NodeStore> {
    store: &'a S,
    next: Option<DataKey<S::Key>>,
}

impl<'a, S: NodeStore> RingIter<'a, S> {
    /// Iterates from `first` to the end of its ring.
    #[inline]
    pub fn new(store: &'a S, first: Option<DataKey<S::Key>>) -> Self {
        Self { store, next: first }
    }
}

impl<S: NodeStore> Iterator for RingIter<'_, S> {
    type Item = DataKey<S::Key>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.next = cur.step(self.store);
        Some(cur)
    }
}

impl<S: NodeStore> FusedIterator for RingIter<'_, S> {}

// =============================================================================
// DocIter
// =============================================================================

/// Document-order iterator over a ring and every ring nested below it.
///
/// Each node is followed by the contents of its subring, then by its
/// successor. The walk never leaves the ring it started in.
///
/// Created by [`HeadKey::iter_below`](crate::HeadKey::iter_below) and
/// [`Multiring::iter`](crate::Multiring::iter).
pub struct DocIter<'a, S: NodeStore> {
    store: &'a S,
    next: Option<DataKey<S::Key>>,
    depth: usize,
    yielded_depth: usize,
}

impl<'a, S: NodeStore> DocIter<'a, S> {
    /// Iterates in document order from `first`, staying below its ring.
    #[inline]
    pub fn new(store: &'a S, first: Option<DataKey<S::Key>>) -> Self {
        Self {
            store,
            next: first,
            depth: 0,
            yielded_depth: 0,
        }
    }

    /// Nesting depth of the most recently yielded node.
    ///
    /// 0 for nodes of the starting ring, 1 for its subrings, and so on.
    #[inline]
    pub fn depth(&self) -> usize {
        self.yielded_depth
    }

    /// Adapts this iterator to yield payloads instead of keys.
    #[inline]
    pub fn values(self) -> Values<'a, S> {
        Values { inner: self }
    }
}

impl<S: NodeStore> Iterator for DocIter<'_, S> {
    type Item = DataKey<S::Key>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.yielded_depth = self.depth;
        self.next = step_within(self.store, cur, &mut self.depth);
        Some(cur)
    }
}

impl<S: NodeStore> FusedIterator for DocIter<'_, S> {}

/// Document-order iterator over payloads.
///
/// Created by [`DocIter::values`] and
/// [`Multiring::values`](crate::Multiring::values).
pub struct Values<'a, S: NodeStore> {
    inner: DocIter<'a, S>,
}

impl<'a, S: NodeStore> Iterator for Values<'a, S> {
    type Item = &'a S::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let store = self.inner.store;
        self.inner.next().map(|key| store.data(key).value())
    }
}

impl<S: NodeStore> FusedIterator for Values<'_, S> {}

#[cfg(test)]
mod tests {
    use crate::{BoxedRingStorage, HeadKey};

    #[test]
    fn ring_iter_stops_at_open_end() {
        let mut store: BoxedRingStorage<u8> = BoxedRingStorage::with_capacity(1, 4);
        let head: HeadKey = store.try_new_head().unwrap();
        let nodes: Vec<_> = (1..=3).map(|v| store.try_new_data(v).unwrap()).collect();
        head.extend(&mut store, nodes.iter().copied());

        assert_eq!(head.iter(&store).collect::<Vec<_>>(), nodes);
        head.open(&mut store);
        assert_eq!(head.iter(&store).collect::<Vec<_>>(), nodes);
    }

    #[test]
    fn doc_iter_reports_depth() {
        let mut store: BoxedRingStorage<u8> = BoxedRingStorage::with_capacity(4, 8);
        let root = store.try_new_head().unwrap();
        let sub = store.try_new_head().unwrap();
        let low = store.try_new_head().unwrap();

        let a = store.try_new_data(1).unwrap();
        let b = store.try_new_data(2).unwrap();
        let x = store.try_new_data(10).unwrap();
        let y = store.try_new_data(100).unwrap();

        root.extend(&mut store, [a, b]);
        sub.append(&mut store, x);
        low.append(&mut store, y);
        a.attach_subring(&mut store, sub).unwrap();
        x.attach_subring(&mut store, low).unwrap();

        let mut iter = root.iter_below(&store);
        let mut seen = Vec::new();
        while let Some(key) = iter.next() {
            seen.push((*key.value(&store), iter.depth()));
        }
        assert_eq!(seen, vec![(1, 0), (10, 1), (100, 2), (2, 0)]);
    }

    #[test]
    fn values_follow_document_order() {
        let mut store: BoxedRingStorage<&str> = BoxedRingStorage::with_capacity(2, 4);
        let root = store.try_new_head().unwrap();
        let sub = store.try_new_head().unwrap();
        let a = store.try_new_data("a").unwrap();
        let b = store.try_new_data("b").unwrap();
        let c = store.try_new_data("c").unwrap();

        root.extend(&mut store, [a, c]);
        sub.append(&mut store, b);
        a.attach_subring(&mut store, sub).unwrap();

        let out: Vec<_> = root.iter_below(&store).values().copied().collect();
        assert_eq!(out, ["a", "b", "c"]);

        let inner: Vec<_> = sub.iter_below(&store).values().copied().collect();
        assert_eq!(inner, ["b"]);
    }
}
