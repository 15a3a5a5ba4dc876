//! Data-node operations.
//!
//! Methods on [`DataKey`] are anchored at one element of a ring. Two families
//! exist side by side:
//!
//! - ring-local (`step`, `count_after`, `find_last`, `remove_after`, ...) only
//!   look at the ring the node sits in;
//! - document-order (`step_z`, `count_after_z`, `find_last_z`,
//!   `remove_after_z`, ...) walk the whole multiring: they descend into a
//!   non-empty subring as soon as they meet it and climb back to the superring
//!   once a ring is exhausted.
//!
//! Document-order walks need every ring on the way to be closed; an open ring
//! ends the walk.
//!
//! # Example
//!
//! ```
//! use multiring::BoxedRingStorage;
//!
//! let mut store: BoxedRingStorage<u32> = BoxedRingStorage::with_capacity(4, 16);
//! let root = store.try_new_head().unwrap();
//! let sub = store.try_new_head().unwrap();
//!
//! let a = store.try_new_data(1).unwrap();
//! let b = store.try_new_data(2).unwrap();
//! let x = store.try_new_data(10).unwrap();
//!
//! root.extend(&mut store, [a, b]);
//! sub.append(&mut store, x);
//! a.attach_subring(&mut store, sub).unwrap();
//!
//! assert_eq!(a.step(&store), Some(b)); // stays in the ring
//! assert_eq!(a.step_z(&store), Some(x)); // descends first
//! assert_eq!(x.step_z(&store), Some(b)); // then climbs back
//! assert_eq!(x.find_root(&store), Some(root));
//! ```

use tracing::{debug, trace};

use crate::{AttachError, DataKey, HeadKey, Key, Multiring, NodeRef, NodeStore};

/// Rewrites the `next` link of `node`.
///
/// A subring head's `link_above` always equals its parent's `next`, so the
/// attached head (if any) is updated along with it.
#[inline]
pub(crate) fn relink<S: NodeStore>(
    store: &mut S,
    node: DataKey<S::Key>,
    next: Option<NodeRef<S::Key>>,
) {
    let subring = {
        let data = store.data_mut(node);
        data.next = next;
        data.subring
    };
    if let Some(head) = subring {
        store.head_mut(head).link_above = next;
    }
}

/// Follows `link` upwards until it lands on a data node.
///
/// Head links mean "this ring is exhausted, continue after its parent".
#[inline]
pub(crate) fn ascend<S: NodeStore>(
    store: &S,
    mut link: Option<NodeRef<S::Key>>,
) -> Option<DataKey<S::Key>> {
    loop {
        match link? {
            NodeRef::Data(data) => return Some(data),
            NodeRef::Head(head) => link = store.head(head).link_above,
        }
    }
}

/// Links `nodes` one after another, returning the first and last of them.
pub(crate) fn chain<S, I>(store: &mut S, nodes: I) -> Option<(DataKey<S::Key>, DataKey<S::Key>)>
where
    S: NodeStore,
    I: IntoIterator<Item = DataKey<S::Key>>,
{
    let mut nodes = nodes.into_iter();
    let first = nodes.next()?;
    let mut last = first;
    for node in nodes {
        relink(store, last, Some(NodeRef::Data(node)));
        last = node;
    }
    Some((first, last))
}

/// Document-order successor of `node` that does not leave the structure the
/// walk started in.
///
/// `depth` counts the subrings entered since the start; reaching the end of
/// the starting ring (depth 0) ends the walk.
pub(crate) fn step_within<S: NodeStore>(
    store: &S,
    node: DataKey<S::Key>,
    depth: &mut usize,
) -> Option<DataKey<S::Key>> {
    if let Some(first) = node.step_below(store) {
        *depth += 1;
        return Some(first);
    }

    let mut link = store.data(node).next;
    loop {
        match link? {
            NodeRef::Data(next) => return Some(next),
            NodeRef::Head(head) => {
                if *depth == 0 {
                    return None;
                }
                *depth -= 1;
                link = store.head(head).link_above;
            }
        }
    }
}

impl<K: Key> DataKey<K> {
    /// The payload of this node.
    #[inline]
    pub fn value<S: NodeStore<Key = K>>(self, store: &S) -> &S::Value {
        store.data(self).value()
    }

    /// The payload of this node, mutably.
    #[inline]
    pub fn value_mut<S: NodeStore<Key = K>>(self, store: &mut S) -> &mut S::Value {
        store.data_mut(self).value_mut()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Next data node in this ring, or `None` if this is the last one.
    ///
    /// Never enters subrings.
    #[inline]
    pub fn step<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        match store.data(self).next {
            Some(NodeRef::Data(next)) => Some(next),
            _ => None,
        }
    }

    /// First data node of this node's subring.
    ///
    /// `None` when no subring is attached or the subring is empty.
    #[inline]
    pub fn step_below<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        store
            .data(self)
            .subring
            .and_then(|head| store.head(head).first)
    }

    /// Next data node in document order across the whole multiring.
    ///
    /// Descends into a non-empty subring, otherwise moves to the next node,
    /// climbing out of as many exhausted rings as needed. `None` once the
    /// traversal is complete.
    #[inline]
    pub fn step_z<S: NodeStore<Key = K>>(self, store: &S) -> Option<DataKey<K>> {
        self.step_below(store)
            .or_else(|| ascend(store, store.data(self).next))
    }

    /// Number of data nodes after this one in its ring.
    pub fn count_after<S: NodeStore<Key = K>>(self, store: &S) -> usize {
        let mut count = 0;
        let mut cur = self;
        while let Some(next) = cur.step(store) {
            count += 1;
            cur = next;
        }
        count
    }

    /// Number of data nodes after this one in document order.
    pub fn count_after_z<S: NodeStore<Key = K>>(self, store: &S) -> usize {
        let mut count = 0;
        let mut cur = self;
        while let Some(next) = cur.step_z(store) {
            count += 1;
            cur = next;
        }
        count
    }

    /// Last data node of this ring (this node itself if nothing follows).
    pub fn find_last<S: NodeStore<Key = K>>(self, store: &S) -> DataKey<K> {
        let mut cur = self;
        while let Some(next) = cur.step(store) {
            cur = next;
        }
        cur
    }

    /// Last data node in document order, i.e. the node after which
    /// [`step_z`](Self::step_z) returns `None`.
    ///
    /// Climbs to the outermost ring that still has nodes ahead, takes its last
    /// node, then follows the chain of trailing subrings down.
    pub fn find_last_z<S: NodeStore<Key = K>>(self, store: &S) -> DataKey<K> {
        let mut last = self.find_last(store);

        let mut link = store.data(last).next;
        while let Some(NodeRef::Head(head)) = link {
            link = store.head(head).link_above;
            if let Some(NodeRef::Data(above)) = link {
                last = above.find_last(store);
                link = store.data(last).next;
            }
        }

        while let Some(first) = last.step_below(store) {
            last = first.find_last(store);
        }
        last
    }

    /// Head of this node's ring, or `None` if the ring is open.
    pub fn find_head<S: NodeStore<Key = K>>(self, store: &S) -> Option<HeadKey<K>> {
        match store.data(self.find_last(store)).next {
            Some(NodeRef::Head(head)) => Some(head),
            _ => None,
        }
    }

    /// First head met walking forward in document order.
    ///
    /// That is this node's own subring if one is attached (even an empty one),
    /// else the subring of a later node in the ring, else the ring's own head.
    /// `None` if the ring is open and nothing is attached after this node.
    pub fn find_head_z<S: NodeStore<Key = K>>(self, store: &S) -> Option<HeadKey<K>> {
        let mut cur = self;
        loop {
            let data = store.data(cur);
            if let Some(subring) = data.subring {
                return Some(subring);
            }
            match data.next? {
                NodeRef::Data(next) => cur = next,
                NodeRef::Head(head) => return Some(head),
            }
        }
    }

    /// Root head of the multiring this node belongs to.
    ///
    /// `None` if any ring on the way up is open.
    pub fn find_root<S: NodeStore<Key = K>>(self, store: &S) -> Option<HeadKey<K>> {
        let mut head = self.find_head(store)?;
        loop {
            head = match store.head(head).link_above {
                None => return Some(head),
                Some(NodeRef::Head(above)) => above,
                Some(NodeRef::Data(above)) => above.find_head(store)?,
            };
        }
    }

    // ========================================================================
    // Insertion / removal
    // ========================================================================

    /// Links `node` directly after this node.
    ///
    /// `node` must not be linked into any ring.
    #[inline]
    pub fn insert_after<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) {
        let next = store.data(self).next;
        relink(store, node, next);
        relink(store, self, Some(NodeRef::Data(node)));
    }

    /// Links `nodes` directly after this node, keeping their order.
    ///
    /// None of `nodes` may be linked into any ring, and none may repeat. An
    /// empty sequence is a no-op.
    pub fn insert_many_after<S, I>(self, store: &mut S, nodes: I)
    where
        S: NodeStore<Key = K>,
        I: IntoIterator<Item = DataKey<K>>,
    {
        if let Some((first, last)) = chain(store, nodes) {
            let next = store.data(self).next;
            relink(store, last, next);
            relink(store, self, Some(NodeRef::Data(first)));
        }
    }

    /// Unlinks and returns the node following this one in its ring.
    ///
    /// The returned node keeps its subring, whose `link_above` is cleared.
    pub fn pop_next<S: NodeStore<Key = K>>(self, store: &mut S) -> Option<DataKey<K>> {
        let next = self.step(store)?;
        let after = store.data(next).next;
        relink(store, self, after);
        relink(store, next, None);
        Some(next)
    }

    /// Unlinks `node` if it comes after this node in the same ring.
    ///
    /// Returns `false` if `node` was not found.
    pub fn remove_after<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        let mut prev = self;
        while let Some(next) = prev.step(store) {
            if next == node {
                prev.pop_next(store);
                return true;
            }
            prev = next;
        }
        false
    }

    /// Unlinks `node` if it comes after this node in document order.
    ///
    /// Searches this node's subring, the rest of the ring, and everything the
    /// document-order walk reaches from there. Returns `false` if `node` was
    /// not found.
    pub fn remove_after_z<S: NodeStore<Key = K>>(self, store: &mut S, node: DataKey<K>) -> bool {
        let mut cur = self;
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
            let Some(next) = cur.step_z(store) else {
                return false;
            };
            if next == node {
                // climbed out of a finished subring
                return node.find_head(store).is_some_and(|ring| ring.remove(store, node));
            }
            cur = next;
        }
    }

    // ========================================================================
    // Subrings
    // ========================================================================

    /// Attaches `head` as this node's subring.
    ///
    /// The head's `link_above` is set to this node's `next`, so a walk that
    /// exhausts the subring continues right after this node.
    ///
    /// # Errors
    ///
    /// - [`AttachError::DataNodeAlreadyHasSubring`] if this node has a subring
    /// - [`AttachError::HeadNodeAlreadyHasSuperring`] if `head` is attached
    ///   elsewhere
    /// - [`AttachError::UnsafeLoopCreation`] if `head` encloses this node
    ///   (for example `head` is the root of this node's multiring)
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// This node's ring must be closed. On an open ring the last node has no
    /// `next`, so the attached head keeps `link_above == None`: it still
    /// reports [`is_root`](HeadKey::is_root), can be attached again elsewhere,
    /// and the loop check cannot see past the open ring.
    pub fn attach_subring<S: NodeStore<Key = K>>(
        self,
        store: &mut S,
        head: HeadKey<K>,
    ) -> Result<(), AttachError> {
        let err = if store.data(self).subring.is_some() {
            Some(AttachError::DataNodeAlreadyHasSubring)
        } else if store.head(head).link_above.is_some() {
            Some(AttachError::HeadNodeAlreadyHasSuperring)
        } else if self.is_enclosed_by(store, head) {
            Some(AttachError::UnsafeLoopCreation)
        } else {
            None
        };
        if let Some(err) = err {
            debug!(node = ?self, ?head, %err, "subring attach rejected");
            return Err(err);
        }

        let next = store.data(self).next;
        store.data_mut(self).subring = Some(head);
        store.head_mut(head).link_above = next;
        trace!(node = ?self, ?head, "subring attached");
        Ok(())
    }

    /// Detaches this node's subring, returning its head.
    ///
    /// Both links are cleared; the subring itself is left intact.
    pub fn detach_subring<S: NodeStore<Key = K>>(self, store: &mut S) -> Option<HeadKey<K>> {
        let head = store.data_mut(self).subring.take()?;
        store.head_mut(head).link_above = None;
        trace!(node = ?self, ?head, "subring detached");
        Some(head)
    }

    /// Detaches this node's subring as a standalone multiring.
    pub fn detach_multiring<S: NodeStore<Key = K>>(self, store: &mut S) -> Option<Multiring<K>> {
        self.detach_subring(store).map(Multiring::new)
    }

    /// Returns `true` if `head` is the head of this node's ring or of any
    /// ring above it.
    ///
    /// An open ring hides everything above it; the walk stops there.
    fn is_enclosed_by<S: NodeStore<Key = K>>(self, store: &S, head: HeadKey<K>) -> bool {
        let Some(mut ring) = self.find_head(store) else {
            return false;
        };
        loop {
            if ring == head {
                return true;
            }
            ring = match store.head(ring).link_above {
                None => return false,
                Some(NodeRef::Head(above)) => above,
                Some(NodeRef::Data(above)) => match above.find_head(store) {
                    Some(above) => above,
                    None => return false,
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedRingStorage;

    type Store = BoxedRingStorage<u64>;

    fn store() -> Store {
        BoxedRingStorage::with_capacity(16, 64)
    }

    /// Builds a closed ring holding `values`, returning its head and nodes.
    fn ring(store: &mut Store, values: &[u64]) -> (HeadKey, Vec<DataKey>) {
        let head = store.try_new_head().unwrap();
        let nodes: Vec<_> = values
            .iter()
            .map(|&v| store.try_new_data(v).unwrap())
            .collect();
        head.extend(store, nodes.iter().copied());
        (head, nodes)
    }

    fn values_z(store: &Store, from: DataKey) -> Vec<u64> {
        let mut out = vec![*from.value(store)];
        let mut cur = from;
        while let Some(next) = cur.step_z(store) {
            out.push(*next.value(store));
            cur = next;
        }
        out
    }

    #[test]
    fn value_accessors_read_and_write_payload() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1, 2]);

        *n[1].value_mut(&mut store) += 40;
        assert_eq!(*n[0].value(&store), 1);
        assert_eq!(*n[1].value(&store), 42);
    }

    #[test]
    fn step_stays_in_ring() {
        let mut store = store();
        let (head, n) = ring(&mut store, &[1, 2, 3]);

        assert_eq!(n[0].step(&store), Some(n[1]));
        assert_eq!(n[1].step(&store), Some(n[2]));
        assert_eq!(n[2].step(&store), None);
        assert_eq!(store.data(n[2]).next(), Some(NodeRef::Head(head)));
    }

    #[test]
    fn step_below_needs_non_empty_subring() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1]);
        assert_eq!(n[0].step_below(&store), None);

        let empty = store.try_new_head().unwrap();
        n[0].attach_subring(&mut store, empty).unwrap();
        assert_eq!(n[0].step_below(&store), None);

        let x = store.try_new_data(9).unwrap();
        empty.append(&mut store, x);
        assert_eq!(n[0].step_below(&store), Some(x));
    }

    #[test]
    fn step_z_skips_empty_subring() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1, 2]);
        let empty = store.try_new_head().unwrap();
        n[0].attach_subring(&mut store, empty).unwrap();

        assert_eq!(n[0].step_z(&store), n[0].step(&store));
    }

    #[test]
    fn step_z_climbs_several_levels() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1, 2]);
        let (mid_head, mid) = ring(&mut store, &[10]);
        let (low_head, low) = ring(&mut store, &[100, 101]);

        top[0].attach_subring(&mut store, mid_head).unwrap();
        mid[0].attach_subring(&mut store, low_head).unwrap();

        assert_eq!(values_z(&store, top[0]), vec![1, 10, 100, 101, 2]);
        assert_eq!(low[1].step_z(&store), Some(top[1]));
        assert_eq!(top[1].step_z(&store), None);
    }

    #[test]
    fn counts_local_and_document_order() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1, 2, 3]);
        let (sub_head, _) = ring(&mut store, &[10, 11]);
        top[1].attach_subring(&mut store, sub_head).unwrap();

        assert_eq!(top[0].count_after(&store), 2);
        assert_eq!(top[2].count_after(&store), 0);
        assert_eq!(top[0].count_after_z(&store), 4);
        assert_eq!(top[1].count_after_z(&store), 3);
    }

    #[test]
    fn find_last_z_follows_trailing_subrings() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1, 2]);
        let (mid_head, mid) = ring(&mut store, &[10, 11]);
        let (low_head, low) = ring(&mut store, &[100, 101]);

        top[1].attach_subring(&mut store, mid_head).unwrap();
        mid[1].attach_subring(&mut store, low_head).unwrap();

        assert_eq!(top[0].find_last(&store), top[1]);
        assert_eq!(top[0].find_last_z(&store), low[1]);
        assert_eq!(low[0].find_last_z(&store), low[1]);
        assert_eq!(mid[0].find_last_z(&store), low[1]);
    }

    #[test]
    fn find_last_z_climbs_past_finished_rings() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1, 2, 3]);
        let (sub_head, sub) = ring(&mut store, &[10, 11]);
        top[0].attach_subring(&mut store, sub_head).unwrap();

        assert_eq!(sub[0].find_last_z(&store), top[2]);
    }

    #[test]
    fn find_heads_and_root() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2]);
        let (sub_head, sub) = ring(&mut store, &[10, 11]);
        let empty = store.try_new_head().unwrap();
        top[1].attach_subring(&mut store, sub_head).unwrap();
        sub[1].attach_subring(&mut store, empty).unwrap();

        assert_eq!(sub[0].find_head(&store), Some(sub_head));
        assert_eq!(sub[0].find_root(&store), Some(root));
        assert_eq!(top[0].find_root(&store), Some(root));

        assert_eq!(top[0].find_head_z(&store), Some(sub_head));
        assert_eq!(sub[0].find_head_z(&store), Some(empty));
        assert_eq!(top[1].find_head_z(&store), Some(sub_head));
    }

    #[test]
    fn open_ring_hides_head_and_root() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2]);
        root.open(&mut store);

        assert_eq!(top[0].find_head(&store), None);
        assert_eq!(top[0].find_root(&store), None);
        assert_eq!(top[0].find_head_z(&store), None);
    }

    #[test]
    fn insert_after_and_pop_next() {
        let mut store = store();
        let (head, n) = ring(&mut store, &[1, 3]);
        let two = store.try_new_data(2).unwrap();

        n[0].insert_after(&mut store, two);
        assert_eq!(head.iter(&store).map(|k| *k.value(&store)).collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(n[0].pop_next(&mut store), Some(two));
        assert_eq!(store.data(two).next(), None);
        assert_eq!(n[1].pop_next(&mut store), None);
        assert_eq!(head.count(&store), 2);
    }

    #[test]
    fn insert_many_after_keeps_order() {
        let mut store = store();
        let (head, n) = ring(&mut store, &[1, 5]);
        let block: Vec<_> = [2, 3, 4]
            .into_iter()
            .map(|v| store.try_new_data(v).unwrap())
            .collect();

        n[0].insert_many_after(&mut store, block.iter().copied());
        n[1].insert_many_after(&mut store, []);

        let values: Vec<_> = head.iter(&store).map(|k| *k.value(&store)).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(head.is_open(&store), Some(false));
    }

    #[test]
    fn pop_next_clears_link_above_of_popped_subring() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1, 2, 3]);
        let sub = store.try_new_head().unwrap();
        n[1].attach_subring(&mut store, sub).unwrap();
        assert_eq!(store.head(sub).link_above(), Some(NodeRef::Data(n[2])));

        assert_eq!(n[0].pop_next(&mut store), Some(n[1]));
        assert_eq!(store.data(n[1]).subring(), Some(sub));
        assert_eq!(store.head(sub).link_above(), None);
    }

    #[test]
    fn link_above_mirrors_next_after_insert() {
        let mut store = store();
        let (head, n) = ring(&mut store, &[1, 3]);
        let sub = store.try_new_head().unwrap();
        n[1].attach_subring(&mut store, sub).unwrap();
        assert_eq!(store.head(sub).link_above(), Some(NodeRef::Head(head)));

        let four = store.try_new_data(4).unwrap();
        n[1].insert_after(&mut store, four);
        assert_eq!(store.head(sub).link_above(), Some(NodeRef::Data(four)));
    }

    #[test]
    fn remove_after_scans_ring_only() {
        let mut store = store();
        let (head, n) = ring(&mut store, &[1, 2, 3]);
        let (sub_head, sub) = ring(&mut store, &[10]);
        n[0].attach_subring(&mut store, sub_head).unwrap();

        assert!(!n[0].remove_after(&mut store, sub[0]));
        assert!(!n[1].remove_after(&mut store, n[0]));
        assert!(n[0].remove_after(&mut store, n[2]));
        assert_eq!(head.count(&store), 2);
        assert_eq!(store.data(n[2]).next(), None);
    }

    #[test]
    fn remove_after_z_reaches_subrings_and_superrings() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2, 3]);
        let (sub_head, sub) = ring(&mut store, &[10, 11]);
        top[0].attach_subring(&mut store, sub_head).unwrap();

        assert!(top[0].remove_after_z(&mut store, sub[0]));
        assert_eq!(sub_head.count(&store), 1);

        assert!(sub[1].remove_after_z(&mut store, top[2]));
        assert_eq!(root.count(&store), 2);

        assert!(!sub[1].remove_after_z(&mut store, top[0]));
    }

    #[test]
    fn remove_after_z_finds_node_after_finished_subring() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2, 3]);
        let (sub_head, sub) = ring(&mut store, &[10, 11]);
        top[0].attach_subring(&mut store, sub_head).unwrap();
        assert_eq!(sub[1].step_z(&store), Some(top[1]));

        assert!(sub[1].remove_after_z(&mut store, top[1]));
        assert_eq!(root.iter(&store).map(|k| *k.value(&store)).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(store.data(top[1]).next(), None);
        assert_eq!(store.head(sub_head).link_above(), Some(NodeRef::Data(top[2])));
    }

    #[test]
    fn remove_after_z_climbs_two_levels() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2, 3]);
        let (mid_head, mid) = ring(&mut store, &[10]);
        let (low_head, low) = ring(&mut store, &[100]);
        top[0].attach_subring(&mut store, mid_head).unwrap();
        mid[0].attach_subring(&mut store, low_head).unwrap();

        assert!(low[0].remove_after_z(&mut store, top[1]));
        assert_eq!(root.count(&store), 2);
        assert_eq!(values_z(&store, top[0]), vec![1, 10, 100, 3]);
        assert!(!low[0].remove_after_z(&mut store, top[1]));
    }

    #[test]
    fn attach_and_detach_round_trip() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1, 2]);
        let (sub_head, _) = ring(&mut store, &[10]);

        let node_before = store.data(n[0]).clone();
        let head_before = *store.head(sub_head);

        n[0].attach_subring(&mut store, sub_head).unwrap();
        assert_eq!(store.data(n[0]).subring(), Some(sub_head));
        assert_eq!(store.head(sub_head).link_above(), Some(NodeRef::Data(n[1])));

        assert_eq!(n[0].detach_subring(&mut store), Some(sub_head));
        assert_eq!(store.data(n[0]), &node_before);
        assert_eq!(store.head(sub_head), &head_before);
        assert_eq!(n[0].detach_subring(&mut store), None);
    }

    #[test]
    fn attach_rejects_second_subring() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1]);
        let a = store.try_new_head().unwrap();
        let b = store.try_new_head().unwrap();
        n[0].attach_subring(&mut store, a).unwrap();

        assert_eq!(
            n[0].attach_subring(&mut store, b),
            Err(AttachError::DataNodeAlreadyHasSubring)
        );
        assert_eq!(store.data(n[0]).subring(), Some(a));
        assert_eq!(store.head(b).link_above(), None);
    }

    #[test]
    fn attach_rejects_head_with_superring() {
        let mut store = store();
        let (_, n) = ring(&mut store, &[1, 2]);
        let sub = store.try_new_head().unwrap();
        n[0].attach_subring(&mut store, sub).unwrap();

        assert_eq!(
            n[1].attach_subring(&mut store, sub),
            Err(AttachError::HeadNodeAlreadyHasSuperring)
        );
        assert_eq!(store.data(n[1]).subring(), None);
        assert_eq!(store.head(sub).link_above(), Some(NodeRef::Data(n[1])));
    }

    #[test]
    fn attach_rejects_enclosing_heads() {
        let mut store = store();
        let (root, top) = ring(&mut store, &[1, 2]);
        let (sub_head, sub) = ring(&mut store, &[10]);
        top[0].attach_subring(&mut store, sub_head).unwrap();

        // the root, from its own ring and from a nested one
        assert_eq!(
            top[1].attach_subring(&mut store, root),
            Err(AttachError::UnsafeLoopCreation)
        );
        assert_eq!(
            sub[0].attach_subring(&mut store, root),
            Err(AttachError::UnsafeLoopCreation)
        );
        assert_eq!(store.data(top[1]).subring(), None);
        assert_eq!(store.data(sub[0]).subring(), None);
        assert_eq!(store.head(root).link_above(), None);
    }

    #[test]
    fn attach_under_open_ring_tail_leaves_head_unlinked() {
        let mut store = store();
        let (root, n) = ring(&mut store, &[1, 2]);
        let sub = store.try_new_head().unwrap();
        root.open(&mut store);

        n[1].attach_subring(&mut store, sub).unwrap();
        assert_eq!(store.data(n[1]).subring(), Some(sub));
        assert!(sub.is_root(&store));

        root.close(&mut store);
        assert_eq!(store.head(sub).link_above(), Some(NodeRef::Head(root)));
        assert!(!sub.is_root(&store));
    }

    #[test]
    fn attach_accepts_foreign_root() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1]);
        let (other_root, other) = ring(&mut store, &[7, 8]);

        top[0].attach_subring(&mut store, other_root).unwrap();
        assert_eq!(other[0].find_root(&store), top[0].find_root(&store));
    }

    #[test]
    fn detach_multiring_yields_standalone_root() {
        let mut store = store();
        let (_, top) = ring(&mut store, &[1]);
        let (sub_head, _) = ring(&mut store, &[10, 11]);
        top[0].attach_subring(&mut store, sub_head).unwrap();

        let detached = top[0].detach_multiring(&mut store).unwrap();
        assert_eq!(detached.root(), Some(sub_head));
        assert!(sub_head.is_root(&store));
        assert_eq!(detached.len(&store), 2);
    }
}
