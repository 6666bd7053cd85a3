//! Statistics gathered by the tables.
use std::{cell::Cell, fmt, time::Duration};

use quanta::Instant;

use crate::TableKind;

/// Event counters shared by all table kinds.
///
/// A counter that does not apply to a table kind stays at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Inserts of a new key whose first target slot or bucket held a different key.
    pub collisions: u64,
    /// Sum of the probe lengths of all resident keys (linear probing only).
    pub probes: u64,
    /// Keys displaced by cuckoo eviction, including rolled back chains.
    pub kicks: u64,
    /// Longest eviction chain seen so far.
    pub longest_chain: u64,
    /// Eviction chains that reached their bound.
    pub cycles: u64,
    /// Bucket splits.
    pub splits: u64,
    /// Doublings of a slot array pair, a slot array or a directory.
    pub doublings: u64,
}

/// Occupancy of one half of a two-table variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubtableStats {
    /// Number of slots or directory entries.
    pub size: usize,
    /// Number of stored keys.
    pub load: usize,
}

impl SubtableStats {
    /// Returns the fraction of slots in use, or zero for an empty subtable.
    pub fn load_factor(&self) -> f64 {
        load_factor(self.load, self.size)
    }
}

/// Snapshot of a table's state, returned by the tables' `stats` methods.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    /// The kind of table these statistics describe.
    pub kind: TableKind,
    /// Number of addressable slots or directory entries, across both halves for two-table kinds.
    pub size: usize,
    /// Number of stored keys.
    pub load: usize,
    /// Event counters accumulated over the table's lifetime.
    pub counters: Counters,
    /// Per-half occupancy for two-table kinds, empty otherwise.
    pub subtables: Vec<SubtableStats>,
    /// Wall time spent inside insert and lookup operations.
    pub elapsed: Duration,
}

impl Stats {
    /// Returns `load / size`, or zero when `size` is zero.
    pub fn load_factor(&self) -> f64 {
        load_factor(self.load, self.size)
    }

    /// Returns the average probe length of the resident keys, or `None` for an empty table.
    pub fn average_probe(&self) -> Option<f64> {
        (self.load != 0).then(|| self.counters.probes as f64 / self.load as f64)
    }
}

fn load_factor(load: usize, size: usize) -> f64 {
    if size == 0 {
        0.0
    } else {
        load as f64 / size as f64
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Counters {
            collisions,
            probes: _,
            kicks,
            longest_chain,
            cycles,
            splits,
            doublings,
        } = self.counters;

        writeln!(f, "--- table stats ---")?;
        writeln!(f, "    table type: {}", self.kind)?;
        writeln!(f, "  current size: {} slots", self.size)?;
        writeln!(f, "  current load: {} items", self.load)?;
        writeln!(f, "   load factor: {:.3}%", self.load_factor() * 100.0)?;
        writeln!(f, "    collisions: {collisions}")?;
        match self.kind {
            TableKind::Linear => {
                writeln!(f, "     step size: {} slots", crate::linear::STEP_SIZE)?;
                match self.average_probe() {
                    Some(average) => writeln!(f, " average probe: {average:.1}")?,
                    None => writeln!(f, " average probe: -")?,
                }
            }
            TableKind::Extendible => {
                writeln!(f, "        splits: {splits}")?;
            }
            TableKind::Cuckoo => {
                writeln!(f, "         kicks: {kicks}")?;
                writeln!(f, " longest chain: {longest_chain}")?;
                writeln!(f, "        cycles: {cycles}")?;
            }
            TableKind::ExtendibleCuckoo => {
                writeln!(f, "         kicks: {kicks}")?;
                writeln!(f, " longest chain: {longest_chain}")?;
                writeln!(f, "        cycles: {cycles}")?;
                writeln!(f, "        splits: {splits}")?;
            }
        }
        writeln!(f, "     doublings: {doublings}")?;
        writeln!(f, "    time spent: {:.6} sec", self.elapsed.as_secs_f64())?;

        for (number, subtable) in self.subtables.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "--- table {} stats ---", number + 1)?;
            writeln!(f, "  current size: {} slots", subtable.size)?;
            writeln!(f, "  current load: {} items", subtable.load)?;
            writeln!(f, "   load factor: {:.3}%", subtable.load_factor() * 100.0)?;
        }

        writeln!(f, "--- end stats ---")
    }
}

/// Accumulates the time spent in table operations.
///
/// Uses a [`Cell`] so that lookups, which only borrow the table, are timed as well.
#[derive(Debug, Default)]
pub(crate) struct Elapsed(Cell<Duration>);

impl Elapsed {
    pub(crate) fn add_since(&self, start_time: Instant) {
        self.0.set(self.0.get() + start_time.elapsed());
    }

    pub(crate) fn get(&self) -> Duration {
        self.0.get()
    }
}
