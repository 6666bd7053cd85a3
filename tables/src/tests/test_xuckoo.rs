#![allow(missing_docs)]
use super::*;
use crate::{
    test_util::{FnHash, CONSTANT},
    CapacityError, SubtableStats,
};

// keys below 256 all share the second hash
const LOW_BITS: FnHash = FnHash(|key| key as u32, |key| (key >> 8) as u32);

#[test]
fn inserts_alternate_to_emptier_directory() {
    let mut table = ExtendibleCuckooTable::with_hasher(LOW_BITS);
    table.insert(0);
    table.insert(1);
    assert!(table.directory(Side::First).holds(0, 0));
    assert!(table.directory(Side::Second).holds(0, 1));
    assert_eq!(table.stats().counters.collisions, 0);
    table.check();
}

#[test]
fn cycle_splits_smaller_directory_until_free() {
    let mut table = ExtendibleCuckooTable::with_hasher(LOW_BITS);
    for key in [0, 1, 2] {
        assert!(table.insert(key));
    }

    let first = table.directory(Side::First);
    let second = table.directory(Side::Second);
    // a single split of the first directory frees the bucket for key 1, so the second is untouched
    assert_eq!(first.size(), 2);
    assert_eq!(second.size(), 1);
    assert_eq!(first.bucket(0).key(), Some(2));
    assert_eq!(first.bucket(1).key(), Some(1));
    assert_eq!(second.bucket(0).key(), Some(0));

    let stats = table.stats();
    assert_eq!(stats.size, 3);
    assert_eq!(stats.load, 3);
    assert_eq!(stats.counters.collisions, 1);
    assert_eq!(stats.counters.cycles, 1);
    assert_eq!(stats.counters.kicks, 2);
    assert_eq!(stats.counters.longest_chain, 2);
    assert_eq!(stats.counters.splits, 1);
    assert_eq!(stats.counters.doublings, 1);
    assert_eq!(
        stats.subtables,
        [
            SubtableStats { size: 2, load: 2 },
            SubtableStats { size: 1, load: 1 }
        ]
    );
    table.check();

    // now the second directory is smaller, but splitting it leaves key 1 blocked by key 2, so the
    // first directory is split next
    assert!(table.insert(3));
    let stats = table.stats();
    assert_eq!(stats.counters.cycles, 2);
    assert_eq!(stats.counters.splits, 3);
    assert_eq!(stats.counters.doublings, 3);
    assert!([0, 1, 2, 3].iter().all(|&key| table.lookup(key)));
    assert!(!table.lookup(4));
    assert_eq!(table.directory(Side::First).size(), 4);
    assert_eq!(table.directory(Side::Second).size(), 2);
    table.check();
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut table = ExtendibleCuckooTable::with_hasher(LOW_BITS);
    table.insert(0);
    table.insert(1);
    table.insert(2);
    for key in [0, 1, 2] {
        assert!(!table.insert(key));
    }
    assert_eq!(table.len(), 3);
    assert_eq!(table.stats().counters.collisions, 1);
}

#[test]
fn failed_split_rolls_back_chain() {
    let mut table = ExtendibleCuckooTable::with_hasher(CONSTANT).with_size_limit(4);
    table.insert(10);
    table.insert(11);
    assert_eq!(
        table.try_insert(12),
        Err(CapacityError {
            requested: 4,
            limit: 4
        })
    );
    assert_eq!(table.len(), 2);
    assert!(table.lookup(10));
    assert!(table.lookup(11));
    assert!(!table.lookup(12));
    // the keys are back where they were, in buckets that stay split
    assert!(table.directory(Side::First).holds(0, 10));
    assert!(table.directory(Side::Second).holds(0, 11));
    assert_eq!(table.directory(Side::First).size(), 2);
    assert_eq!(table.directory(Side::Second).size(), 2);
    assert_eq!(table.stats().counters.cycles, 1);
    table.check();
}

#[test]
fn dump_lists_both_directories() {
    let mut table = ExtendibleCuckooTable::with_hasher(LOW_BITS);
    table.insert(5);
    let dump = table.to_string();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[0], "--- table ---");
    assert_eq!(lines[1], "table 1");
    assert!(lines.contains(&"table 2"));
    assert_eq!(lines.last(), Some(&"--- end table ---"));
    assert!(dump.contains("[5]"));
    assert!(dump.contains("[ ]"));
}

#[test]
fn many_keys_with_default_hash() {
    let mut table = ExtendibleCuckooTable::new();
    for key in (0..2000).map(|i| i * 7919 + 5) {
        assert!(table.insert(key));
    }
    assert_eq!(table.len(), 2000);
    assert!((0..2000).all(|i| table.lookup(i * 7919 + 5)));
    assert!(!table.lookup(0));
    table.check();
}
