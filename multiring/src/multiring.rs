//! The multiring handle.

use crate::{DataKey, DocIter, HeadKey, Key, NodeStore, Values};

/// A hierarchy of rings, identified by its root head.
///
/// Like the ring operations, `Multiring` does not own nodes: it only records
/// which head is the root and delegates to [`HeadKey`] for the rest. A
/// multiring may be rootless, in which case it is empty and every mutating
/// operation is a no-op.
///
/// # Example
///
/// ```
/// use multiring::{BoxedRingStorage, Multiring};
///
/// let mut store: BoxedRingStorage<u32> = BoxedRingStorage::with_capacity(2, 8);
/// let root = store.try_new_head().unwrap();
/// let mut tree = Multiring::new(root);
///
/// let a = store.try_new_data(1).unwrap();
/// let b = store.try_new_data(2).unwrap();
/// tree.extend(&mut store, [a, b]);
///
/// assert_eq!(tree.len(&store), 2);
/// assert_eq!(tree.find_last(&store), Some(b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiring<K: Key = u32> {
    root: Option<HeadKey<K>>,
}

impl<K: Key> Default for Multiring<K> {
    fn default() -> Self {
        Self::rootless()
    }
}

impl<K: Key> Multiring<K> {
    /// Creates a multiring rooted at `root`.
    #[inline]
    pub const fn new(root: HeadKey<K>) -> Self {
        Self { root: Some(root) }
    }

    /// Creates a multiring without a root.
    #[inline]
    pub const fn rootless() -> Self {
        Self { root: None }
    }

    /// The root head.
    #[inline]
    pub fn root(&self) -> Option<HeadKey<K>> {
        self.root
    }

    /// Replaces the root, returning the previous one.
    #[inline]
    pub fn set_root(&mut self, root: HeadKey<K>) -> Option<HeadKey<K>> {
        self.root.replace(root)
    }

    /// Removes the root, leaving the multiring rootless.
    #[inline]
    pub fn take_root(&mut self) -> Option<HeadKey<K>> {
        self.root.take()
    }

    /// Returns `true` if there is no root.
    #[inline]
    pub fn is_rootless(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if the root ring has no data nodes (or there is no root).
    #[inline]
    pub fn is_empty<S: NodeStore<Key = K>>(&self, store: &S) -> bool {
        self.root.is_none_or(|root| root.is_empty(store))
    }

    /// Number of data nodes in the whole multiring.
    pub fn len<S: NodeStore<Key = K>>(&self, store: &S) -> usize {
        self.root.map_or(0, |root| root.count_below(store))
    }

    /// First data node in document order.
    #[inline]
    pub fn first<S: NodeStore<Key = K>>(&self, store: &S) -> Option<DataKey<K>> {
        self.root?.step(store)
    }

    /// Last data node in document order.
    pub fn find_last<S: NodeStore<Key = K>>(&self, store: &S) -> Option<DataKey<K>> {
        let mut last = self.root?.find_last(store)?;
        while let Some(first) = last.step_below(store) {
            last = first.find_last(store);
        }
        Some(last)
    }

    /// Links `node` after the last data node in document order.
    ///
    /// On an empty multiring the node becomes the root ring's first node.
    pub fn append<S: NodeStore<Key = K>>(&self, store: &mut S, node: DataKey<K>) {
        let Some(root) = self.root else {
            return;
        };
        match self.find_last(store) {
            Some(last) => last.insert_after(store, node),
            None => root.insert_after(store, node),
        }
    }

    /// Links `nodes`, in order, after the last data node in document order.
    pub fn extend<S, I>(&self, store: &mut S, nodes: I)
    where
        S: NodeStore<Key = K>,
        I: IntoIterator<Item = DataKey<K>>,
    {
        let Some(root) = self.root else {
            return;
        };
        match self.find_last(store) {
            Some(last) => last.insert_many_after(store, nodes),
            None => root.insert_many_after(store, nodes),
        }
    }

    /// Unlinks `node` from wherever it sits in the multiring.
    ///
    /// Returns `false` if `node` was not found.
    pub fn remove<S: NodeStore<Key = K>>(&self, store: &mut S, node: DataKey<K>) -> bool {
        self.root
            .is_some_and(|root| root.remove_below(store, node))
    }

    /// Unlinks every data node of the root ring.
    ///
    /// Nested rings stay attached to their (now unlinked) parent nodes.
    pub fn clear<S: NodeStore<Key = K>>(&self, store: &mut S) {
        if let Some(root) = self.root {
            root.clear(store);
        }
    }

    /// Iterates over all data nodes in document order.
    pub fn iter<'a, S: NodeStore<Key = K>>(&self, store: &'a S) -> DocIter<'a, S> {
        DocIter::new(store, self.first(store))
    }

    /// Iterates over all payloads in document order.
    pub fn values<'a, S: NodeStore<Key = K>>(&self, store: &'a S) -> Values<'a, S> {
        self.iter(store).values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedRingStorage;

    type Store = BoxedRingStorage<u64>;

    fn collect(tree: &Multiring, store: &Store) -> Vec<u64> {
        tree.values(store).copied().collect()
    }

    #[test]
    fn rootless_is_inert() {
        let mut store: Store = BoxedRingStorage::with_capacity(1, 1);
        let node = store.try_new_data(1).unwrap();
        let tree = Multiring::<u32>::default();

        assert!(tree.is_rootless());
        assert!(tree.is_empty(&store));
        assert_eq!(tree.len(&store), 0);
        assert_eq!(tree.first(&store), None);
        assert_eq!(tree.find_last(&store), None);

        tree.append(&mut store, node);
        tree.extend(&mut store, [node]);
        assert_eq!(store.data(node).next(), None);
        assert!(!tree.remove(&mut store, node));
        tree.clear(&mut store);
        assert_eq!(tree.iter(&store).count(), 0);
    }

    #[test]
    fn root_accessors() {
        let mut store: Store = BoxedRingStorage::with_capacity(2, 1);
        let a = store.try_new_head().unwrap();
        let b = store.try_new_head().unwrap();

        let mut tree = Multiring::new(a);
        assert_eq!(tree.root(), Some(a));
        assert_eq!(tree.set_root(b), Some(a));
        assert_eq!(tree.take_root(), Some(b));
        assert!(tree.is_rootless());
    }

    #[test]
    fn append_goes_after_document_last() {
        let mut store: Store = BoxedRingStorage::with_capacity(2, 8);
        let root = store.try_new_head().unwrap();
        let sub = store.try_new_head().unwrap();
        let tree = Multiring::new(root);

        let a = store.try_new_data(1).unwrap();
        let b = store.try_new_data(2).unwrap();
        let c = store.try_new_data(3).unwrap();

        tree.append(&mut store, a);
        assert_eq!(tree.first(&store), Some(a));

        sub.append(&mut store, b);
        a.attach_subring(&mut store, sub).unwrap();
        assert_eq!(tree.find_last(&store), Some(b));

        tree.append(&mut store, c);
        assert_eq!(sub.count(&store), 2);
        assert_eq!(collect(&tree, &store), vec![1, 2, 3]);
        assert_eq!(tree.len(&store), 3);
    }

    #[test]
    fn remove_reaches_nested_rings() {
        let mut store: Store = BoxedRingStorage::with_capacity(2, 8);
        let root = store.try_new_head().unwrap();
        let sub = store.try_new_head().unwrap();
        let tree = Multiring::new(root);

        let a = store.try_new_data(1).unwrap();
        let b = store.try_new_data(2).unwrap();
        let x = store.try_new_data(10).unwrap();
        tree.extend(&mut store, [a, b]);
        sub.append(&mut store, x);
        a.attach_subring(&mut store, sub).unwrap();

        assert!(tree.remove(&mut store, x));
        assert!(!tree.remove(&mut store, x));
        assert_eq!(collect(&tree, &store), vec![1, 2]);

        tree.clear(&mut store);
        assert!(tree.is_empty(&store));
        assert_eq!(store.data(a).subring(), Some(sub));
    }
}
