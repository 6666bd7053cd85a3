//! Hash table using linear probing to resolve collisions.
use std::fmt;

use dynhash_inthash::{HashPair, IntHash, MAX_TABLE_SIZE};
use quanta::Instant;

use crate::{
    error::CapacityError,
    stats::{Counters, Elapsed, Stats},
    TableKind,
};

#[cfg(test)]
#[path = "tests/test_linear.rs"]
mod test_linear;

/// How many slots to advance at a time while looking for a free slot.
pub const STEP_SIZE: usize = 1;

/// Hash table storing keys in a single array of slots, probing linearly from `h1(key)`.
///
/// When a probe sequence wraps all the way around the array without finding a free slot, the
/// array is doubled and every key is rehashed into the new array.
#[derive(Debug)]
pub struct LinearTable<H = IntHash> {
    hasher: H,
    slots: Vec<Option<u64>>,
    load: usize,
    limit: usize,
    counters: Counters,
    elapsed: Elapsed,
}

enum Probe {
    Found,
    Vacant { address: usize, steps: usize },
    Full,
}

impl LinearTable {
    /// Creates an empty table with `size` slots, using the default hash functions.
    ///
    /// # Panics
    /// Panics if `size` is zero or not below [`MAX_TABLE_SIZE`].
    pub fn new(size: usize) -> Self {
        Self::with_hasher(size, IntHash)
    }
}

impl<H: HashPair> LinearTable<H> {
    /// Creates an empty table with `size` slots, using the given hash functions.
    ///
    /// # Panics
    /// Panics if `size` is zero or not below [`MAX_TABLE_SIZE`].
    pub fn with_hasher(size: usize, hasher: H) -> Self {
        assert!(size > 0, "table size must be positive");
        assert!(size < MAX_TABLE_SIZE, "table size must be below {MAX_TABLE_SIZE}");
        LinearTable {
            hasher,
            slots: vec![None; size],
            load: 0,
            limit: MAX_TABLE_SIZE,
            counters: Counters::default(),
            elapsed: Elapsed::default(),
        }
    }

    /// Lowers the number of slots the table must stay below from [`MAX_TABLE_SIZE`] to `limit`.
    ///
    /// # Panics
    /// Panics if `limit` exceeds [`MAX_TABLE_SIZE`] or does not exceed the current size.
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        assert!(limit <= MAX_TABLE_SIZE, "size limit must not exceed {MAX_TABLE_SIZE}");
        assert!(self.slots.len() < limit, "size limit must exceed the current size");
        self.limit = limit;
        self
    }

    /// Returns the number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.load
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.load == 0
    }

    /// Returns the key stored at `address`, if any.
    pub fn get(&self, address: usize) -> Option<u64> {
        self.slots.get(address).copied().flatten()
    }

    fn home(&self, key: u64) -> usize {
        self.hasher.h1(key) as usize % self.slots.len()
    }

    fn probe(&self, key: u64) -> Probe {
        let size = self.slots.len();
        let mut address = self.home(key);
        for steps in 0..size {
            match self.slots[address] {
                None => return Probe::Vacant { address, steps },
                Some(resident) if resident == key => return Probe::Found,
                Some(_) => address = (address + STEP_SIZE) % size,
            }
        }
        Probe::Full
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Panics
    /// Panics if the table would have to grow to its size limit.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Inserts `key`, returning `Ok(false)` if it was already present.
    ///
    /// Returns an error, leaving the table unchanged, if making room would require as many slots as
    /// the size limit allows or more.
    pub fn try_insert(&mut self, key: u64) -> Result<bool, CapacityError> {
        let start_time = Instant::now();
        let result = self.insert_inner(key);
        self.elapsed.add_since(start_time);
        result
    }

    fn insert_inner(&mut self, key: u64) -> Result<bool, CapacityError> {
        let mut collided = false;
        loop {
            match self.probe(key) {
                Probe::Found => return Ok(false),
                Probe::Vacant { address, steps } => {
                    if collided || steps > 0 {
                        self.counters.collisions += 1;
                    }
                    self.slots[address] = Some(key);
                    self.load += 1;
                    self.counters.probes += steps as u64 + 1;
                    return Ok(true);
                }
                Probe::Full => {
                    collided = true;
                    self.grow()?;
                }
            }
        }
    }

    /// Returns `true` if `key` is stored in the table.
    pub fn lookup(&self, key: u64) -> bool {
        let start_time = Instant::now();
        let found = matches!(self.probe(key), Probe::Found);
        self.elapsed.add_since(start_time);
        found
    }

    fn grow(&mut self) -> Result<(), CapacityError> {
        let size = self.slots.len() * 2;
        CapacityError::check(size, self.limit)?;
        log::debug!("doubling linear table to {size} slots");

        let old_slots = std::mem::replace(&mut self.slots, vec![None; size]);
        self.counters.doublings += 1;
        self.counters.probes = 0;
        for key in old_slots.into_iter().flatten() {
            self.reinsert(key);
        }
        Ok(())
    }

    // Only used while rehashing, where every key is known to be distinct and a free slot exists.
    fn reinsert(&mut self, key: u64) {
        let size = self.slots.len();
        let mut address = self.home(key);
        let mut steps = 0;
        while self.slots[address].is_some() {
            address = (address + STEP_SIZE) % size;
            steps += 1;
        }
        self.slots[address] = Some(key);
        self.counters.probes += steps + 1;
    }

    /// Returns a snapshot of the table's statistics.
    pub fn stats(&self) -> Stats {
        Stats {
            kind: TableKind::Linear,
            size: self.slots.len(),
            load: self.load,
            counters: self.counters,
            subtables: vec![],
            elapsed: self.elapsed.get(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        let stored: Vec<u64> = self.slots.iter().flatten().copied().collect();
        assert_eq!(stored.len(), self.load);
        let mut probes = 0;
        for (address, slot) in self.slots.iter().enumerate() {
            let Some(key) = *slot else { continue };
            // every slot between the home address and the key's slot must be occupied
            let home = self.home(key);
            let distance = (address + self.slots.len() - home) % self.slots.len();
            for step in 0..distance {
                let between = (home + step) % self.slots.len();
                assert!(self.slots[between].is_some());
                assert_ne!(self.slots[between], Some(key), "duplicate key {key}");
            }
            probes += distance as u64 + 1;
        }
        assert_eq!(probes, self.counters.probes);
    }
}

impl<H> fmt::Display for LinearTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table size: {}", self.slots.len())?;
        writeln!(f, "   address | key")?;
        for (address, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(key) => writeln!(f, " {address:9} | {key}")?,
                None => writeln!(f, " {address:9} | -")?,
            }
        }
        writeln!(f, "--- end table ---")
    }
}
