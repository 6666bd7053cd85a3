//! Extendible cuckoo hash table: cuckoo hashing between two extendible directories.
//!
//! Each key lives either in the first directory, in the bucket addressed by the low bits of
//! `h1(key)`, or in the second directory at `h2(key)`. Inserts first try to make room by cuckoo
//! eviction between the two directories. Once an eviction chain gets too long, instead of doubling
//! everything, only the bucket blocking the held key in the currently smaller directory is split,
//! repeatedly, until that key finds a free bucket.
use std::fmt;

use dynhash_inthash::{HashPair, IntHash};
use quanta::Instant;

use crate::{
    cuckoo::Side,
    directory::Directory,
    error::CapacityError,
    stats::{Counters, Elapsed, Stats, SubtableStats},
    TableKind,
};

#[cfg(test)]
#[path = "tests/test_xuckoo.rs"]
mod test_xuckoo;

/// One step of an eviction chain: `incoming` replaced `evicted` in the directory of `side`.
#[derive(Clone, Copy, Debug)]
struct Kick {
    side: Side,
    incoming: u64,
    evicted: u64,
}

/// Extendible cuckoo hash table with single-key buckets.
///
/// Both directories start out with a single bucket and grow independently.
#[derive(Debug)]
pub struct ExtendibleCuckooTable<H = IntHash> {
    hasher: H,
    directories: [Directory; 2],
    counters: Counters,
    elapsed: Elapsed,
}

impl Default for ExtendibleCuckooTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendibleCuckooTable {
    /// Creates an empty table using the default hash functions.
    pub fn new() -> Self {
        Self::with_hasher(IntHash)
    }
}

impl<H: HashPair> ExtendibleCuckooTable<H> {
    /// Creates an empty table using the given hash functions.
    pub fn with_hasher(hasher: H) -> Self {
        ExtendibleCuckooTable {
            hasher,
            directories: [Directory::new(), Directory::new()],
            counters: Counters::default(),
            elapsed: Elapsed::default(),
        }
    }

    /// Lowers the number of entries each directory must stay below from [`MAX_TABLE_SIZE`] to
    /// `limit`.
    ///
    /// # Panics
    /// Panics if `limit` exceeds [`MAX_TABLE_SIZE`] or does not exceed a directory's current size.
    ///
    /// [`MAX_TABLE_SIZE`]: dynhash_inthash::MAX_TABLE_SIZE
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        for directory in &mut self.directories {
            directory.set_size_limit(limit);
        }
        self
    }

    /// Returns the directory of the given side.
    pub fn directory(&self, side: Side) -> &Directory {
        &self.directories[side.index()]
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.directories[0].len() + self.directories[1].len()
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the address of `key` in the directory of the given side.
    pub fn address(&self, side: Side, key: u64) -> usize {
        self.directories[side.index()].address(side.hash(&self.hasher, key))
    }

    fn holds(&self, side: Side, key: u64) -> bool {
        self.directories[side.index()].holds(self.address(side, key), key)
    }

    fn is_free(&self, side: Side, key: u64) -> bool {
        let directory = &self.directories[side.index()];
        directory.bucket(self.address(side, key)).key().is_none()
    }

    /// Returns the side whose directory has fewer entries, preferring the first side.
    fn smaller_side(&self) -> Side {
        if self.directories[0].size() <= self.directories[1].size() {
            Side::First
        } else {
            Side::Second
        }
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Panics
    /// Panics if a directory would have to grow to its size limit.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Inserts `key`, returning `Ok(false)` if it was already present.
    ///
    /// Returns an error if making room would require a directory of as many entries as the size
    /// limit allows or more. In that case the eviction chain is rolled back and the table holds
    /// exactly the keys it held before the call, although buckets split along the way remain split.
    pub fn try_insert(&mut self, key: u64) -> Result<bool, CapacityError> {
        let start_time = Instant::now();
        let result = self.insert_inner(key);
        self.elapsed.add_since(start_time);
        result
    }

    fn insert_inner(&mut self, key: u64) -> Result<bool, CapacityError> {
        if self.holds(Side::First, key) || self.holds(Side::Second, key) {
            return Ok(false);
        }

        // start in the directory holding fewer keys
        let mut side = if self.directories[0].len() <= self.directories[1].len() {
            Side::First
        } else {
            Side::Second
        };
        if !self.is_free(side, key) {
            self.counters.collisions += 1;
        }

        let bound = 2 * self.directories[0].size();
        let mut chain: Vec<Kick> = vec![];
        let mut held = key;
        while !self.is_free(side, held) {
            if chain.len() == bound {
                self.counters.cycles += 1;
                log::debug!("eviction cycle after {bound} kicks, splitting buckets");
                match self.split_for(held) {
                    Ok(free_side) => side = free_side,
                    Err(err) => {
                        self.record_chain(chain.len());
                        self.roll_back(&chain);
                        return Err(err);
                    }
                }
                break;
            }
            let address = self.address(side, held);
            let directory = &mut self.directories[side.index()];
            if let Some(evicted) = directory.replace(address, held) {
                chain.push(Kick {
                    side,
                    incoming: held,
                    evicted,
                });
                held = evicted;
            }
            side = side.other();
        }

        let address = self.address(side, held);
        self.directories[side.index()].replace(address, held);
        self.record_chain(chain.len());
        Ok(true)
    }

    /// Splits the bucket `held` addresses in the currently smaller directory until `held` addresses
    /// a free bucket in the directory just split, returning the side of that directory.
    ///
    /// The smaller directory is chosen anew only when a split left the target occupied.
    fn split_for(&mut self, held: u64) -> Result<Side, CapacityError> {
        loop {
            let side = self.smaller_side();
            let address = self.address(side, held);
            let hasher = &self.hasher;
            self.directories[side.index()].split(address, |key| side.hash(hasher, key))?;
            if self.is_free(side, held) {
                return Ok(side);
            }
        }
    }

    /// Undoes an eviction chain after the held key could not be placed.
    ///
    /// Splits only refine the partition of hash values into buckets, so keys that did not share a
    /// bucket before the chain started still don't, and every evicted key finds its bucket free.
    fn roll_back(&mut self, chain: &[Kick]) {
        for kick in chain.iter().rev() {
            let incoming_address = self.address(kick.side, kick.incoming);
            let evicted_address = self.address(kick.side, kick.evicted);
            let directory = &mut self.directories[kick.side.index()];
            let taken = directory.take(incoming_address);
            debug_assert_eq!(taken, Some(kick.incoming));
            let displaced = directory.replace(evicted_address, kick.evicted);
            debug_assert_eq!(displaced, None);
        }
    }

    fn record_chain(&mut self, kicks: usize) {
        self.counters.kicks += kicks as u64;
        self.counters.longest_chain = self.counters.longest_chain.max(kicks as u64);
    }

    /// Returns `true` if `key` is stored in the table.
    pub fn lookup(&self, key: u64) -> bool {
        let start_time = Instant::now();
        let found = self.holds(Side::First, key) || self.holds(Side::Second, key);
        self.elapsed.add_since(start_time);
        found
    }

    /// Returns a snapshot of the table's statistics.
    pub fn stats(&self) -> Stats {
        let [first, second] = &self.directories;
        Stats {
            kind: TableKind::ExtendibleCuckoo,
            size: first.size() + second.size(),
            load: self.len(),
            counters: Counters {
                splits: first.splits() + second.splits(),
                doublings: first.doublings() + second.doublings(),
                ..self.counters
            },
            subtables: self
                .directories
                .iter()
                .map(|directory| SubtableStats {
                    size: directory.size(),
                    load: directory.len(),
                })
                .collect(),
            elapsed: self.elapsed.get(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert!(self.counters.longest_chain <= 2 * self.directories[0].size() as u64);
        for side in Side::ALL {
            let directory = &self.directories[side.index()];
            directory.check(|key| side.hash(&self.hasher, key));
            for key in directory.keys() {
                assert!(!self.holds(side.other(), key), "key {key} stored twice");
            }
        }
    }
}

impl<H> fmt::Display for ExtendibleCuckooTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table ---")?;
        for (number, directory) in self.directories.iter().enumerate() {
            writeln!(f, "table {}", number + 1)?;
            directory.fmt_layout(f)?;
        }
        writeln!(f, "--- end table ---")
    }
}
