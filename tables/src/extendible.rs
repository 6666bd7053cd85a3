//! Extendible hash table with a single key per bucket.
use std::fmt;

use dynhash_inthash::{HashPair, IntHash};
use quanta::Instant;

use crate::{
    directory::Directory,
    error::CapacityError,
    stats::{Counters, Elapsed, Stats},
    TableKind,
};

#[cfg(test)]
#[path = "tests/test_extendible.rs"]
mod test_extendible;

/// Extendible hash table whose buckets hold a single key, addressed by the low bits of `h1(key)`.
///
/// Collisions are resolved by splitting the colliding bucket, doubling the directory whenever the
/// bucket already uses every address bit. The table starts out with one bucket.
#[derive(Debug)]
pub struct ExtendibleTable<H = IntHash> {
    hasher: H,
    directory: Directory,
    collisions: u64,
    elapsed: Elapsed,
}

impl Default for ExtendibleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendibleTable {
    /// Creates an empty table using the default hash functions.
    pub fn new() -> Self {
        Self::with_hasher(IntHash)
    }
}

impl<H: HashPair> ExtendibleTable<H> {
    /// Creates an empty table using the given hash functions.
    pub fn with_hasher(hasher: H) -> Self {
        ExtendibleTable {
            hasher,
            directory: Directory::new(),
            collisions: 0,
            elapsed: Elapsed::default(),
        }
    }

    /// Lowers the number of directory entries the table must stay below from
    /// [`MAX_TABLE_SIZE`] to `limit`.
    ///
    /// # Panics
    /// Panics if `limit` exceeds [`MAX_TABLE_SIZE`] or does not exceed the current size.
    ///
    /// [`MAX_TABLE_SIZE`]: dynhash_inthash::MAX_TABLE_SIZE
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.directory.set_size_limit(limit);
        self
    }

    /// Returns the directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Panics
    /// Panics if the directory would have to grow to its size limit.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Inserts `key`, returning `Ok(false)` if it was already present.
    ///
    /// Returns an error if separating `key` from the resident key would require a directory of as
    /// many entries as the size limit allows or more. Buckets split before the error remain split,
    /// but the table holds the same keys as before the call.
    pub fn try_insert(&mut self, key: u64) -> Result<bool, CapacityError> {
        let start_time = Instant::now();
        let result = self.insert_inner(key);
        self.elapsed.add_since(start_time);
        result
    }

    fn insert_inner(&mut self, key: u64) -> Result<bool, CapacityError> {
        let hash = self.hasher.h1(key);
        let mut address = self.directory.address(hash);
        match self.directory.bucket(address).key() {
            Some(resident) if resident == key => return Ok(false),
            Some(_) => self.collisions += 1,
            None => (),
        }

        // a split may leave both keys in the same bucket, so keep splitting until they separate
        while self.directory.bucket(address).key().is_some() {
            let hasher = &self.hasher;
            self.directory.split(address, |key| hasher.h1(key))?;
            address = self.directory.address(hash);
        }
        self.directory.replace(address, key);
        Ok(true)
    }

    /// Returns `true` if `key` is stored in the table.
    pub fn lookup(&self, key: u64) -> bool {
        let start_time = Instant::now();
        let found = self
            .directory
            .holds(self.directory.address(self.hasher.h1(key)), key);
        self.elapsed.add_since(start_time);
        found
    }

    /// Returns a snapshot of the table's statistics.
    pub fn stats(&self) -> Stats {
        Stats {
            kind: TableKind::Extendible,
            size: self.directory.size(),
            load: self.directory.len(),
            counters: Counters {
                collisions: self.collisions,
                splits: self.directory.splits(),
                doublings: self.directory.doublings(),
                ..Counters::default()
            },
            subtables: vec![],
            elapsed: self.elapsed.get(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.directory.check(|key| self.hasher.h1(key));
    }
}

impl<H> fmt::Display for ExtendibleTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table ---")?;
        self.directory.fmt_layout(f)?;
        writeln!(f, "--- end table ---")
    }
}
