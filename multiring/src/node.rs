//! Node layouts.
//!
//! A ring is one [`HeadNode`] followed by zero or more [`DataNode`]s. The
//! structs only carry links; the algorithms live on the key handles
//! ([`HeadKey`], [`DataKey`]) and take the node store as an argument.
//!
//! The raw setters below write exactly one field. They exist for layers that
//! keep their own bookkeeping on top of the core; they do not maintain the
//! structural invariants on their own.

use crate::{DataKey, HeadKey, Key, NodeRef};

/// Entry point of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadNode<K: Key = u32> {
    pub(crate) first: Option<DataKey<K>>,
    pub(crate) link_above: Option<NodeRef<K>>,
}

impl<K: Key> HeadNode<K> {
    /// Creates an unlinked, empty head.
    #[inline]
    pub const fn new() -> Self {
        Self {
            first: None,
            link_above: None,
        }
    }

    /// First data node of the ring, or `None` if the ring is empty.
    #[inline]
    pub fn first(&self) -> Option<DataKey<K>> {
        self.first
    }

    /// Next node in the superring, or `None` for a root.
    ///
    /// Equal to the `next` link of the data node this head is attached to.
    #[inline]
    pub fn link_above(&self) -> Option<NodeRef<K>> {
        self.link_above
    }

    /// Overwrites the first-node link.
    #[inline]
    pub fn set_first(&mut self, first: Option<DataKey<K>>) {
        self.first = first;
    }

    /// Overwrites the superring link.
    #[inline]
    pub fn set_link_above(&mut self, link_above: Option<NodeRef<K>>) {
        self.link_above = link_above;
    }
}

impl<K: Key> Default for HeadNode<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Element of a ring, carrying a value and an optional subring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataNode<V, K: Key = u32> {
    pub(crate) next: Option<NodeRef<K>>,
    pub(crate) subring: Option<HeadKey<K>>,
    pub(crate) value: V,
}

impl<V, K: Key> DataNode<V, K> {
    /// Creates an unlinked node holding `value`.
    #[inline]
    pub const fn new(value: V) -> Self {
        Self {
            next: None,
            subring: None,
            value,
        }
    }

    /// Next node in this ring.
    ///
    /// `Head` of the own ring when this is the last node of a closed ring,
    /// `None` when it is the last node of an open ring (or unlinked).
    #[inline]
    pub fn next(&self) -> Option<NodeRef<K>> {
        self.next
    }

    /// Head of the ring nested below this node.
    #[inline]
    pub fn subring(&self) -> Option<HeadKey<K>> {
        self.subring
    }

    /// The payload.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The payload, mutably.
    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consumes the node, returning the payload.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Overwrites the next link.
    ///
    /// Unlike the core operations this does not update the `link_above` of an
    /// attached subring.
    #[inline]
    pub fn set_next(&mut self, next: Option<NodeRef<K>>) {
        self.next = next;
    }

    /// Overwrites the subring link.
    #[inline]
    pub fn set_subring(&mut self, subring: Option<HeadKey<K>>) {
        self.subring = subring;
    }
}
