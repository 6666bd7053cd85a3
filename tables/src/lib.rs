//! Dynamic hash tables for 64-bit integer keys.
//!
//! Four tables implement the same set-like interface (`insert`, `lookup`, `stats` and a
//! [`Display`](std::fmt::Display) dump of their layout) using different strategies for resolving
//! collisions and growing their storage:
//!
//! * [`LinearTable`]: a single array with linear probing, doubled when a probe wraps around.
//! * [`ExtendibleTable`]: extendible hashing with single-key buckets, splitting buckets and
//!   doubling the directory on demand.
//! * [`CuckooTable`]: two arrays with cuckoo eviction, both doubled when an eviction chain cycles.
//! * [`ExtendibleCuckooTable`]: cuckoo eviction between two extendible directories, splitting a
//!   single bucket of the smaller directory when an eviction chain cycles.
//!
//! [`Table`] selects one of them at runtime by [`TableKind`]. The hash functions are provided by
//! a [`HashPair`](dynhash_inthash::HashPair), [`IntHash`](dynhash_inthash::IntHash) by default.
//!
//! Tables never shrink and do not support removal.
#![warn(missing_docs)]

pub mod cuckoo;
pub mod directory;
pub mod error;
pub mod extendible;
pub mod linear;
pub mod stats;
pub mod table;
pub mod xuckoo;

pub use cuckoo::{CuckooTable, Side};
pub use error::CapacityError;
pub use extendible::ExtendibleTable;
pub use linear::LinearTable;
pub use stats::{Counters, Stats, SubtableStats};
pub use table::{Table, TableKind, UnknownTableKind};
pub use xuckoo::ExtendibleCuckooTable;

pub use dynhash_inthash::{HashPair, IntHash, MAX_TABLE_SIZE};

#[cfg(test)]
pub(crate) mod test_util;
