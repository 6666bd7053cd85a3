//! Hash functions for 64-bit integer keys shared by all dynhash tables.
//!
//! Both functions compute `(A * key + B) mod p` using wrapping 64-bit arithmetic, where `p` is a
//! prime just below `2^31`. The result therefore always fits in 31 bits. Tables reduce it further,
//! either modulo their slot count or by masking off the low bits used as a directory address.
#![warn(missing_docs)]

/// The maximum number of entries a slot array or directory may have.
///
/// A table with `2^27` eight byte entries already occupies 1 GiB, so any growth that would reach
/// this size is refused.
pub const MAX_TABLE_SIZE: usize = 1 << 27;

const A1: u64 = 885390553;
const B1: u64 = 639360243;
const P1: u64 = 2147483629;

const A2: u64 = 853977193;
const B2: u64 = 306837493;
const P2: u64 = 2147483563;

/// First hash function.
#[inline]
pub fn h1(key: u64) -> u32 {
    (A1.wrapping_mul(key).wrapping_add(B1) % P1) as u32
}

/// Second hash function, independent of [`h1`].
#[inline]
pub fn h2(key: u64) -> u32 {
    (A2.wrapping_mul(key).wrapping_add(B2) % P2) as u32
}

/// A pair of independent hash functions for `u64` keys.
///
/// Single-function tables only use [`h1`](HashPair::h1). Implementations must be pure: the same key
/// has to produce the same hashes for the whole lifetime of a table.
pub trait HashPair {
    /// Hash used by linear probing, the first cuckoo array and the first extendible directory.
    fn h1(&self, key: u64) -> u32;
    /// Hash used by the second cuckoo array and the second extendible directory.
    fn h2(&self, key: u64) -> u32;
}

/// The default [`HashPair`], forwarding to [`h1`] and [`h2`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntHash;

impl HashPair for IntHash {
    #[inline]
    fn h1(&self, key: u64) -> u32 {
        h1(key)
    }

    #[inline]
    fn h2(&self, key: u64) -> u32 {
        h2(key)
    }
}

impl<T: HashPair + ?Sized> HashPair for &T {
    #[inline]
    fn h1(&self, key: u64) -> u32 {
        (**self).h1(key)
    }

    #[inline]
    fn h2(&self, key: u64) -> u32 {
        (**self).h2(key)
    }
}
