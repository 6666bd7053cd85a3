//! A table of any kind behind a single interface.
use std::{fmt, str::FromStr};

use dynhash_inthash::{HashPair, IntHash};

use crate::{
    error::CapacityError, stats::Stats, CuckooTable, ExtendibleCuckooTable, ExtendibleTable,
    LinearTable,
};

#[cfg(test)]
#[path = "tests/test_table.rs"]
mod test_table;

/// The collision resolution strategy of a [`Table`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// [`LinearTable`]
    Linear,
    /// [`ExtendibleTable`]
    Extendible,
    /// [`CuckooTable`]
    Cuckoo,
    /// [`ExtendibleCuckooTable`]
    ExtendibleCuckoo,
}

impl TableKind {
    /// All table kinds.
    pub const ALL: [TableKind; 4] = [
        TableKind::Linear,
        TableKind::Extendible,
        TableKind::Cuckoo,
        TableKind::ExtendibleCuckoo,
    ];

    /// The name used to select this kind on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Linear => "linear",
            TableKind::Extendible => "xtndbl1",
            TableKind::Cuckoo => "cuckoo",
            TableKind::ExtendibleCuckoo => "xuckoo",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `UnknownTableKind` is returned when parsing a name that does not denote a [`TableKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTableKind(pub String);

impl fmt::Display for UnknownTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown table type '{}', expected one of: linear, xtndbl1, 1 or cuckoo, 3 or xuckoo",
            self.0
        )
    }
}

impl std::error::Error for UnknownTableKind {}

impl FromStr for TableKind {
    type Err = UnknownTableKind;

    /// Accepts the kind names as well as the numbers `1` (cuckoo) and `3` (xuckoo).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "linear" => Ok(TableKind::Linear),
            "xtndbl1" => Ok(TableKind::Extendible),
            "1" | "cuckoo" => Ok(TableKind::Cuckoo),
            "3" | "xuckoo" => Ok(TableKind::ExtendibleCuckoo),
            _ => Err(UnknownTableKind(name.to_owned())),
        }
    }
}

/// A table of any [`TableKind`], fixed at construction time.
///
/// All operations forward to the table of the selected kind. Dropping the table releases all of
/// its storage.
#[derive(Debug)]
pub enum Table<H = IntHash> {
    /// A [`LinearTable`].
    Linear(LinearTable<H>),
    /// An [`ExtendibleTable`].
    Extendible(ExtendibleTable<H>),
    /// A [`CuckooTable`].
    Cuckoo(CuckooTable<H>),
    /// An [`ExtendibleCuckooTable`].
    ExtendibleCuckoo(ExtendibleCuckooTable<H>),
}

impl Table {
    /// Creates an empty table of the given kind using the default hash functions.
    ///
    /// `size` is the initial number of slots (per array for cuckoo tables). Extendible tables
    /// always start out with a single bucket and ignore it.
    ///
    /// # Panics
    /// Panics if `size` is zero or not below [`MAX_TABLE_SIZE`](dynhash_inthash::MAX_TABLE_SIZE).
    pub fn new(kind: TableKind, size: usize) -> Self {
        Self::with_hasher(kind, size, IntHash)
    }
}

impl<H: HashPair> Table<H> {
    /// Creates an empty table of the given kind using the given hash functions.
    ///
    /// See [`Table::new`] for the meaning of `size`.
    pub fn with_hasher(kind: TableKind, size: usize, hasher: H) -> Self {
        assert!(size > 0, "table size must be positive");
        match kind {
            TableKind::Linear => Table::Linear(LinearTable::with_hasher(size, hasher)),
            TableKind::Extendible => Table::Extendible(ExtendibleTable::with_hasher(hasher)),
            TableKind::Cuckoo => Table::Cuckoo(CuckooTable::with_hasher(size, hasher)),
            TableKind::ExtendibleCuckoo => {
                Table::ExtendibleCuckoo(ExtendibleCuckooTable::with_hasher(hasher))
            }
        }
    }

    /// Lowers the size the table must stay below from
    /// [`MAX_TABLE_SIZE`](dynhash_inthash::MAX_TABLE_SIZE) to `limit`.
    ///
    /// The limit applies per array for cuckoo tables and per directory for extendible tables.
    pub fn with_size_limit(self, limit: usize) -> Self {
        match self {
            Table::Linear(table) => Table::Linear(table.with_size_limit(limit)),
            Table::Extendible(table) => Table::Extendible(table.with_size_limit(limit)),
            Table::Cuckoo(table) => Table::Cuckoo(table.with_size_limit(limit)),
            Table::ExtendibleCuckoo(table) => {
                Table::ExtendibleCuckoo(table.with_size_limit(limit))
            }
        }
    }

    /// Returns the kind of this table.
    pub fn kind(&self) -> TableKind {
        match self {
            Table::Linear(_) => TableKind::Linear,
            Table::Extendible(_) => TableKind::Extendible,
            Table::Cuckoo(_) => TableKind::Cuckoo,
            Table::ExtendibleCuckoo(_) => TableKind::ExtendibleCuckoo,
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        match self {
            Table::Linear(table) => table.len(),
            Table::Extendible(table) => table.len(),
            Table::Cuckoo(table) => table.len(),
            Table::ExtendibleCuckoo(table) => table.len(),
        }
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Panics
    /// Panics if the table would have to grow to its size limit.
    pub fn insert(&mut self, key: u64) -> bool {
        self.try_insert(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Inserts `key`, returning `Ok(false)` if it was already present, or an error if the table
    /// cannot grow any further.
    pub fn try_insert(&mut self, key: u64) -> Result<bool, CapacityError> {
        match self {
            Table::Linear(table) => table.try_insert(key),
            Table::Extendible(table) => table.try_insert(key),
            Table::Cuckoo(table) => table.try_insert(key),
            Table::ExtendibleCuckoo(table) => table.try_insert(key),
        }
    }

    /// Returns `true` if `key` is stored in the table.
    pub fn lookup(&self, key: u64) -> bool {
        match self {
            Table::Linear(table) => table.lookup(key),
            Table::Extendible(table) => table.lookup(key),
            Table::Cuckoo(table) => table.lookup(key),
            Table::ExtendibleCuckoo(table) => table.lookup(key),
        }
    }

    /// Returns a snapshot of the table's statistics.
    pub fn stats(&self) -> Stats {
        match self {
            Table::Linear(table) => table.stats(),
            Table::Extendible(table) => table.stats(),
            Table::Cuckoo(table) => table.stats(),
            Table::ExtendibleCuckoo(table) => table.stats(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        match self {
            Table::Linear(table) => table.check(),
            Table::Extendible(table) => table.check(),
            Table::Cuckoo(table) => table.check(),
            Table::ExtendibleCuckoo(table) => table.check(),
        }
    }
}

impl<H> fmt::Display for Table<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Linear(table) => fmt::Display::fmt(table, f),
            Table::Extendible(table) => fmt::Display::fmt(table, f),
            Table::Cuckoo(table) => fmt::Display::fmt(table, f),
            Table::ExtendibleCuckoo(table) => fmt::Display::fmt(table, f),
        }
    }
}
