//! Key types for node storage.
//!
//! [`Key`] abstracts over the raw slot index a storage hands out. Nodes are
//! never addressed by raw keys though: [`HeadKey`] and [`DataKey`] wrap a raw
//! key with the kind of node it names, so a head can never be passed where a
//! data node is expected.

use core::fmt;

/// Trait for raw key/index types used in storage.
///
/// Provides a sentinel value (`NONE`) and conversion to/from `usize`.
/// Implemented for the unsigned integer types.
///
/// # Example
///
/// ```
/// use multiring::Key;
///
/// let key: u32 = 42;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + 'static {
    /// Sentinel value representing "no key".
    ///
    /// Storage never hands this value out, so capacity is bounded by it.
    const NONE: Self;

    /// Creates a key from a `usize` value.
    fn from_usize(val: usize) -> Self;

    /// Returns the key as a `usize`.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);

/// Handle to a [`HeadNode`](crate::HeadNode) in a node store.
///
/// Ring-scoped operations (counting, appending, rotating, sorting, ...) are
/// methods on this handle; see the [`head`](crate::head) module.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadKey<K: Key = u32>(K);

/// Handle to a [`DataNode`](crate::DataNode) in a node store.
///
/// Node-scoped operations (stepping, inserting after, attaching subrings, ...)
/// are methods on this handle; see the [`data`](crate::data) module.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataKey<K: Key = u32>(K);

macro_rules! impl_typed_key {
    ($name:ident, $tag:literal) => {
        impl<K: Key> $name<K> {
            /// Wraps a raw storage key.
            ///
            /// The raw key must name a node of the matching kind in the
            /// store it is used with.
            #[inline]
            pub const fn from_raw(raw: K) -> Self {
                Self(raw)
            }

            /// Returns the raw storage key.
            #[inline]
            pub const fn raw(self) -> K {
                self.0
            }
        }

        impl<K: Key> fmt::Debug for $name<K> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0.as_usize())
            }
        }
    };
}

impl_typed_key!(HeadKey, "head");
impl_typed_key!(DataKey, "data");
