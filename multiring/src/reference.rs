//! Links that may point at either kind of node.

use crate::{DataKey, HeadKey, Key, NodeStore};

/// A link to a head or to a data node.
///
/// The last data node of a closed ring links to its own head, and a head
/// attached as a subring links to whatever follows its parent data node, so
/// "the next thing" can be either kind. Methods dispatch to the matching
/// [`HeadKey`] or [`DataKey`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef<K: Key = u32> {
    /// A ring's head.
    Head(HeadKey<K>),
    /// A data node.
    Data(DataKey<K>),
}

impl<K: Key> From<HeadKey<K>> for NodeRef<K> {
    #[inline]
    fn from(key: HeadKey<K>) -> Self {
        NodeRef::Head(key)
    }
}

impl<K: Key> From<DataKey<K>> for NodeRef<K> {
    #[inline]
    fn from(key: DataKey<K>) -> Self {
        NodeRef::Data(key)
    }
}

impl<K: Key> NodeRef<K> {
    /// Returns `true` for a head link.
    #[inline]
    pub fn is_head(self) -> bool {
        matches!(self, NodeRef::Head(_))
    }

    /// Returns `true` for a data link.
    #[inline]
    pub fn is_data(self) -> bool {
        matches!(self, NodeRef::Data(_))
    }

    /// The head behind this link, if it is one.
    #[inline]
    pub fn as_head(self) -> Option<HeadKey<K>> {
        match self {
            NodeRef::Head(head) => Some(head),
            NodeRef::Data(_) => None,
        }
    }

    /// The data node behind this link, if it is one.
    #[inline]
    pub fn as_data(self) -> Option<DataKey<K>> {
        match self {
            NodeRef::Head(_) => None,
            NodeRef::Data(data) => Some(data),
        }
    }

    /// Next data node in the same ring. See [`HeadKey::step`], [`DataKey::step`].
    #[inline]
    pub fn step<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        match self {
            NodeRef::Head(head) => head.step(store),
            NodeRef::Data(data) => data.step(store),
        }
    }

    /// Next data node in document order. See [`HeadKey::step_z`], [`DataKey::step_z`].
    #[inline]
    pub fn step_z<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        match self {
            NodeRef::Head(head) => head.step_z(store),
            NodeRef::Data(data) => data.step_z(store),
        }
    }

    /// Last data node of this node's ring (for a head, the ring it defines).
    #[inline]
    pub fn find_last<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        match self {
            NodeRef::Head(head) => head.find_last(store),
            NodeRef::Data(data) => Some(data.find_last(store)),
        }
    }

    /// Links `node` directly after this node.
    #[inline]
    pub fn insert_after<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) {
        match self {
            NodeRef::Head(head) => head.insert_after(store, node),
            NodeRef::Data(data) => data.insert_after(store, node),
        }
    }

    /// Links `nodes`, in order, directly after this node.
    #[inline]
    pub fn insert_many_after<S, I>(self, store: &mut S, nodes: I)
    where
        S: NodeStore<Key = K>,
        I: IntoIterator<Item = DataKey<K>>,
    {
        match self {
            NodeRef::Head(head) => head.insert_many_after(store, nodes),
            NodeRef::Data(data) => data.insert_many_after(store, nodes),
        }
    }

    /// Unlinks and returns the data node directly after this node.
    #[inline]
    pub fn pop_next<S: NodeStore<Key = K>>(self, store: &mut S) -> Option<DataKey<K>> {
        match self {
            NodeRef::Head(head) => head.pop_next(store),
            NodeRef::Data(data) => data.pop_next(store),
        }
    }

    /// Unlinks `node` if it follows this node in the same ring.
    ///
    /// For a head this searches the whole ring ([`HeadKey::remove`]).
    #[inline]
    pub fn remove_after<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        match self {
            NodeRef::Head(head) => head.remove(store, node),
            NodeRef::Data(data) => data.remove_after(store, node),
        }
    }
}
