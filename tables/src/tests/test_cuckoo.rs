#![allow(missing_docs)]
use super::*;
use crate::{test_util::IDENTITY, CapacityError};

#[test]
fn eviction_moves_resident_to_other_array() {
    let mut table = CuckooTable::with_hasher(2, IDENTITY);
    table.insert(0);
    table.insert(4);
    assert_eq!(table.get(Side::First, 0), Some(4));
    assert_eq!(table.get(Side::Second, 0), Some(0));
    assert_eq!(table.side_len(Side::First), 1);
    assert_eq!(table.side_len(Side::Second), 1);

    let stats = table.stats();
    assert_eq!(stats.counters.collisions, 1);
    assert_eq!(stats.counters.kicks, 1);
    assert_eq!(stats.counters.longest_chain, 1);
    assert_eq!(stats.counters.cycles, 0);
    table.check();
}

#[test]
fn cycle_doubles_both_arrays() {
    let mut table = CuckooTable::with_hasher(2, IDENTITY);
    for key in [0, 4, 8] {
        assert!(table.insert(key));
    }
    assert_eq!(table.size(), 4);
    assert!([0, 4, 8].iter().all(|&key| table.lookup(key)));
    assert!(!table.lookup(2));

    let stats = table.stats();
    assert_eq!(stats.size, 8);
    assert_eq!(stats.load, 3);
    assert_eq!(stats.counters.cycles, 1);
    assert_eq!(stats.counters.doublings, 1);
    assert_eq!(stats.counters.longest_chain, 4);
    assert_eq!(stats.subtables.len(), 2);
    assert_eq!(stats.subtables[0].size, 4);
    assert_eq!(stats.subtables[0].load + stats.subtables[1].load, 3);
    table.check();
}

#[test]
fn nearly_full_table_grows_before_placing() {
    let mut table = CuckooTable::new(1);
    table.insert(10);
    assert_eq!(table.size(), 1);
    table.insert(20);
    assert_eq!(table.size(), 2);
    assert!(table.lookup(10));
    assert!(table.lookup(20));
    table.check();
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut table = CuckooTable::with_hasher(2, IDENTITY);
    table.insert(0);
    table.insert(4);
    // 0 now lives in the second array
    assert!(!table.insert(0));
    assert!(!table.insert(4));
    assert_eq!(table.len(), 2);
    assert_eq!(table.stats().counters.collisions, 1);
}

#[test]
fn failed_growth_restores_table() {
    let mut table = CuckooTable::with_hasher(2, IDENTITY).with_size_limit(4);
    table.insert(0);
    table.insert(4);
    assert_eq!(
        table.try_insert(8),
        Err(CapacityError {
            requested: 4,
            limit: 4
        })
    );
    assert_eq!(table.size(), 2);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(Side::First, 0), Some(4));
    assert_eq!(table.get(Side::Second, 0), Some(0));
    assert!(!table.lookup(8));
    assert_eq!(table.stats().counters.doublings, 0);
    assert_eq!(table.stats().counters.cycles, 1);
    table.check();
}

#[test]
fn dump_shows_both_arrays() {
    let mut table = CuckooTable::with_hasher(2, IDENTITY);
    table.insert(0);
    table.insert(4);
    let dump = table.to_string();
    let lines: Vec<Vec<&str>> = dump
        .lines()
        .map(|line| line.split_whitespace().collect())
        .collect();
    assert_eq!(lines[0], ["---", "table", "size:", "2"]);
    assert_eq!(lines[3], ["4", "|", "0", "0", "|", "0"]);
    assert_eq!(lines[4], ["-", "|", "1", "1", "|", "-"]);
    assert_eq!(lines[5], ["---", "end", "table", "---"]);
}

#[test]
fn many_keys_with_default_hash() {
    let mut table = CuckooTable::new(4);
    for key in (0..2000).map(|i| i * 7919 + 1) {
        assert!(table.insert(key));
    }
    assert_eq!(table.len(), 2000);
    assert!((0..2000).all(|i| table.lookup(i * 7919 + 1)));
    assert!(!table.lookup(0));
    table.check();
}
