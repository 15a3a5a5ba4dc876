//! Multirings: nested cyclic singly linked lists over external storage.
//!
//! A *ring* is a head followed by data nodes, each linking to the next; the
//! last one links back to the head (closed ring) or to nothing (open ring).
//! Any data node may carry a *subring*, whose head links to whatever follows
//! that data node. A *multiring* is the hierarchy reachable from one root head.
//!
//! ```text
//! root ─▶ 0 ─▶ 1 ─▶ 2 ─▶ 3 ─▶ root
//!              │    │
//!              ▼    ▼
//!             h1    h2 ─▶ 9 ─▶ h2
//!            (empty)
//! ```
//!
//! *Document order* visits a node, then the contents of its subring, then its
//! successor: `0, 1, 2, 9, 3` above.
//!
//! # Design
//!
//! Nodes are not owned by the structure. They live in a [`NodeStore`] chosen
//! by the caller and are addressed through typed keys ([`HeadKey`],
//! [`DataKey`]). Every operation is a method on a key that takes the store as
//! an argument, rewires at most a handful of links, and never allocates or
//! recurses.
//!
//! ```text
//! RingStorage (BoxedStorage / Slab) - owns nodes, hands out stable keys
//! HeadKey / DataKey / Multiring     - rewire links, own nothing
//! ```
//!
//! # Quick Start
//!
//! ```
//! use multiring::{BoxedRingStorage, Multiring};
//!
//! let mut store: BoxedRingStorage<u32> = BoxedRingStorage::with_capacity(4, 16);
//!
//! let root = store.try_new_head().unwrap();
//! let empty = store.try_new_head().unwrap();
//! let nested = store.try_new_head().unwrap();
//!
//! let nodes: Vec<_> = [0, 1, 2, 3]
//!     .into_iter()
//!     .map(|v| store.try_new_data(v).unwrap())
//!     .collect();
//! root.extend(&mut store, nodes.iter().copied());
//!
//! let nine = store.try_new_data(9).unwrap();
//! nested.append(&mut store, nine);
//!
//! nodes[1].attach_subring(&mut store, empty).unwrap();
//! nodes[2].attach_subring(&mut store, nested).unwrap();
//!
//! let tree = Multiring::new(root);
//! assert_eq!(tree.len(&store), 5);
//!
//! let order: Vec<u32> = tree.values(&store).copied().collect();
//! assert_eq!(order, [0, 1, 2, 9, 3]);
//! ```
//!
//! # Critical Invariant: Same Store Instance
//!
//! Keys are indices into one store. Operations on a multiring must use the
//! store its nodes were created in; keys from another store address unrelated
//! slots.
//!
//! # Preconditions
//!
//! Only [`DataKey::attach_subring`] checks its preconditions and reports
//! violations ([`AttachError`]). Everything else documents what it expects
//! (a node being inserted is unlinked, a ring being walked is well formed);
//! that structural misuse is unchecked and silently corrupts the structure.
//! Keys that do not name an occupied slot of the right kind panic in the
//! [`NodeStore`] lookup.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Allocation | Use Case |
//! |---------|----------|------------|----------|
//! | [`BoxedRingStorage`] | Fixed (runtime) | Single heap alloc per node kind | Default choice |
//! | `SlabRingStorage` | Growable | May reallocate | When size unknown |
//!
//! Enable the `slab` feature for the growable backend.

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod head;
pub mod iter;
pub mod key;
pub mod multiring;
pub mod node;
pub mod reference;
pub mod storage;
pub mod store;

pub use error::AttachError;
pub use iter::{DocIter, RingIter, Values};
pub use key::{DataKey, HeadKey, Key};
pub use multiring::Multiring;
pub use node::{DataNode, HeadNode};
pub use reference::NodeRef;
pub use storage::{BoundedStorage, BoxedStorage, Full, Storage, UnboundedStorage};
pub use store::{BoxedRingStorage, NodeStore, RingStorage};

#[cfg(feature = "slab")]
pub use store::SlabRingStorage;
