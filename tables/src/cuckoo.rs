//! Cuckoo hash table with two arrays of single-key slots.
use std::fmt;

use dynhash_inthash::{HashPair, IntHash, MAX_TABLE_SIZE};
use quanta::Instant;

use crate::{
    error::CapacityError,
    stats::{Counters, Elapsed, Stats, SubtableStats},
    TableKind,
};

#[cfg(test)]
#[path = "tests/test_cuckoo.rs"]
mod test_cuckoo;

/// Selects one half of a two-table variant.
///
/// The first half is addressed by [`HashPair::h1`], the second by [`HashPair::h2`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The half addressed by `h1`.
    First,
    /// The half addressed by `h2`.
    Second,
}

impl Side {
    /// Both sides, in order.
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    /// Returns the other side.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Returns `0` for the first and `1` for the second side.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Computes the hash that addresses `key` on this side.
    #[inline]
    pub fn hash(self, hasher: &impl HashPair, key: u64) -> u32 {
        match self {
            Side::First => hasher.h1(key),
            Side::Second => hasher.h2(key),
        }
    }
}

/// Cuckoo hash table storing each key either in the first array at `h1(key)` or in the second
/// array at `h2(key)`.
///
/// Inserting into an occupied slot evicts the resident key into its slot in the other array, and
/// so on, alternating between the arrays. A chain of `2 * size` evictions is considered a cycle:
/// it is rolled back, both arrays are doubled and the insert is retried.
#[derive(Debug)]
pub struct CuckooTable<H = IntHash> {
    hasher: H,
    arrays: [Vec<Option<u64>>; 2],
    loads: [usize; 2],
    limit: usize,
    counters: Counters,
    elapsed: Elapsed,
}

impl CuckooTable {
    /// Creates an empty table with `size` slots per array, using the default hash functions.
    ///
    /// # Panics
    /// Panics if `size` is zero or not below [`MAX_TABLE_SIZE`].
    pub fn new(size: usize) -> Self {
        Self::with_hasher(size, IntHash)
    }
}

impl<H: HashPair> CuckooTable<H> {
    /// Creates an empty table with `size` slots per array, using the given hash functions.
    ///
    /// # Panics
    /// Panics if `size` is zero or not below [`MAX_TABLE_SIZE`].
    pub fn with_hasher(size: usize, hasher: H) -> Self {
        assert!(size > 0, "table size must be positive");
        assert!(size < MAX_TABLE_SIZE, "table size must be below {MAX_TABLE_SIZE}");
        CuckooTable {
            hasher,
            arrays: [vec![None; size], vec![None; size]],
            loads: [0, 0],
            limit: MAX_TABLE_SIZE,
            counters: Counters::default(),
            elapsed: Elapsed::default(),
        }
    }

    /// Lowers the number of slots per array the table must stay below from [`MAX_TABLE_SIZE`] to
    /// `limit`.
    ///
    /// # Panics
    /// Panics if `limit` exceeds [`MAX_TABLE_SIZE`] or does not exceed the current size.
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        assert!(limit <= MAX_TABLE_SIZE, "size limit must not exceed {MAX_TABLE_SIZE}");
        assert!(self.size() < limit, "size limit must exceed the current size");
        self.limit = limit;
        self
    }

    /// Returns the number of slots in each array.
    pub fn size(&self) -> usize {
        self.arrays[0].len()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.loads[0] + self.loads[1]
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of keys stored in the array of the given side.
    pub fn side_len(&self, side: Side) -> usize {
        self.loads[side.index()]
    }

    /// Returns the key stored at `address` in the array of the given side.
    pub fn get(&self, side: Side, address: usize) -> Option<u64> {
        self.arrays[side.index()].get(address).copied().flatten()
    }

    /// Returns the address of `key` in the array of the given side.
    pub fn address(&self, side: Side, key: u64) -> usize {
        side.hash(&self.hasher, key) as usize % self.size()
    }

    fn holds(&self, side: Side, key: u64) -> bool {
        self.arrays[side.index()][self.address(side, key)] == Some(key)
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Panics
    /// Panics if the arrays would have to grow to the size limit.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Inserts `key`, returning `Ok(false)` if it was already present.
    ///
    /// Returns an error, leaving the table unchanged, if making room would require arrays of as many
    /// slots as the size limit allows or more.
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
        if self.arrays[0][self.address(Side::First, key)].is_some() {
            self.counters.collisions += 1;
        }
        // one slot has to stay free for an eviction chain to be able to end
        if self.len() == 2 * self.size() - 1 {
            self.grow()?;
        }
        while !self.place(key) {
            self.grow()?;
        }
        Ok(true)
    }

    /// Places a key that is known to be absent, following the eviction chain from its slot in the
    /// first array.
    ///
    /// Returns `false` if the chain reached its bound, in which case every eviction has been
    /// undone and the table is exactly as it was before.
    fn place(&mut self, key: u64) -> bool {
        let bound = 2 * self.size();
        let mut chain: Vec<(Side, usize)> = vec![];
        let mut held = key;
        let mut side = Side::First;
        loop {
            let address = self.address(side, held);
            let slot = self.arrays[side.index()][address];
            match slot {
                None => {
                    self.arrays[side.index()][address] = Some(held);
                    self.loads[side.index()] += 1;
                    self.record_chain(chain.len());
                    return true;
                }
                Some(_) if chain.len() == bound => {
                    self.record_chain(chain.len());
                    self.counters.cycles += 1;
                    log::debug!("eviction cycle after {bound} kicks");
                    for &(side, address) in chain.iter().rev() {
                        if let Some(resident) = &mut self.arrays[side.index()][address] {
                            std::mem::swap(resident, &mut held);
                        }
                    }
                    debug_assert_eq!(held, key);
                    return false;
                }
                Some(resident) => {
                    self.arrays[side.index()][address] = Some(held);
                    held = resident;
                    chain.push((side, address));
                    side = side.other();
                }
            }
        }
    }

    fn record_chain(&mut self, kicks: usize) {
        self.counters.kicks += kicks as u64;
        self.counters.longest_chain = self.counters.longest_chain.max(kicks as u64);
    }

    /// Doubles both arrays and rehashes every key, doubling again if rehashing runs into a cycle.
    fn grow(&mut self) -> Result<(), CapacityError> {
        let old_arrays = std::mem::take(&mut self.arrays);
        let old_loads = self.loads;
        let old_counters = self.counters;
        let mut size = old_arrays[0].len();
        loop {
            size *= 2;
            if let Err(err) = CapacityError::check(size, self.limit) {
                self.arrays = old_arrays;
                self.loads = old_loads;
                self.counters = old_counters;
                return Err(err);
            }
            log::debug!("doubling cuckoo table to {size} slots per array");
            self.arrays = [vec![None; size], vec![None; size]];
            self.loads = [0, 0];
            self.counters.doublings += 1;

            if old_arrays
                .iter()
                .flatten()
                .flatten()
                .all(|&key| self.place(key))
            {
                return Ok(());
            }
        }
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
        Stats {
            kind: TableKind::Cuckoo,
            size: 2 * self.size(),
            load: self.len(),
            counters: self.counters,
            subtables: Side::ALL
                .map(|side| SubtableStats {
                    size: self.size(),
                    load: self.side_len(side),
                })
                .to_vec(),
            elapsed: self.elapsed.get(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert!(self.len() < 2 * self.size());
        assert!(self.counters.longest_chain <= 2 * self.size() as u64);
        for side in Side::ALL {
            let array = &self.arrays[side.index()];
            assert_eq!(array.len(), self.size());
            assert_eq!(array.iter().flatten().count(), self.side_len(side));
            for (address, slot) in array.iter().enumerate() {
                let Some(key) = *slot else { continue };
                assert_eq!(self.address(side, key), address, "key {key} not at its address");
                assert!(!self.holds(side.other(), key), "key {key} stored twice");
            }
        }
    }
}

impl<H> fmt::Display for CuckooTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table size: {}", self.arrays[0].len())?;
        writeln!(f, "                    table one         table two")?;
        writeln!(f, "                  key | address     address | key")?;
        for (address, (first, second)) in self.arrays[0].iter().zip(&self.arrays[1]).enumerate() {
            match first {
                Some(key) => write!(f, " {key:20} ")?,
                None => write!(f, " {:>20} ", "-")?,
            }
            write!(f, "| {address:<9} {address:9} |")?;
            match second {
                Some(key) => writeln!(f, " {key}")?,
                None => writeln!(f, " -")?,
            }
        }
        writeln!(f, "--- end table ---")
    }
}
