//! # Key Comparators
//!
//! The comparator is a property of the whole tree, fixed at construction:
//! a stateless strict total order over raw key bytes. It is carried as a
//! type parameter so pages store nothing per-instance; a page only holds
//! a phantom reference to the comparator type.
//!
//! Two implementations cover the common cases:
//!
//! - [`Lexical`] compares keys as byte strings, for callers that encode
//!   order into the bytes themselves.
//! - [`NativeOrder<K>`] decodes a fixed-width native type from each side
//!   and compares with its `Ord`, for the typed map specialization.

use std::cmp::Ordering;
use std::marker::PhantomData;

use zerocopy::{FromBytes, Immutable, IntoBytes};

/// A fixed-width key or value type that round-trips through page bytes.
///
/// Blanket-implemented for every `Copy` type with the zerocopy byte
/// traits, so `u32`, `u64`, `[u8; N]` and `#[derive]`d packed structs all
/// qualify.
pub trait FixedRecord: FromBytes + IntoBytes + Immutable + Copy {}

impl<T: FromBytes + IntoBytes + Immutable + Copy> FixedRecord for T {}

/// Strict total order over key bytes.
///
/// Implementations must be pure and consistent with equality: two keys
/// compare `Equal` exactly when insertion would treat them as duplicates.
pub trait KeyCmp {
    fn compare(a: &[u8], b: &[u8]) -> Ordering;
}

/// Byte-string order.
pub struct Lexical;

impl KeyCmp for Lexical {
    #[inline]
    fn compare(a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// Decodes a fixed-width `K` from each side and compares with `K::Ord`.
pub struct NativeOrder<K>(PhantomData<K>);

impl<K: FixedRecord + Ord> KeyCmp for NativeOrder<K> {
    #[inline]
    fn compare(a: &[u8], b: &[u8]) -> Ordering {
        // INVARIANT: every key in a tree using this comparator is exactly
        // size_of::<K>() bytes, enforced by the typed insert path.
        let ka = K::read_from_bytes(a).unwrap();
        let kb = K::read_from_bytes(b).unwrap();
        ka.cmp(&kb)
    }
}
