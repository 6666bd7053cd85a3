#![allow(missing_docs)]
use super::*;
use rand::prelude::*;
use zwohash::HashSet;

#[test]
fn kind_names_round_trip() {
    for kind in TableKind::ALL {
        assert_eq!(kind.name().parse::<TableKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.name());
    }
    assert_eq!("1".parse::<TableKind>(), Ok(TableKind::Cuckoo));
    assert_eq!("3".parse::<TableKind>(), Ok(TableKind::ExtendibleCuckoo));
    assert_eq!(
        "xtndbln".parse::<TableKind>(),
        Err(UnknownTableKind("xtndbln".to_owned()))
    );
}

#[test]
fn dispatch_keeps_kind() {
    for kind in TableKind::ALL {
        let table = Table::new(kind, 4);
        assert_eq!(table.kind(), kind);
        assert_eq!(table.stats().kind, kind);
        assert!(table.is_empty());
    }
}

#[test]
fn lookup_misses_absent_keys() {
    for kind in TableKind::ALL {
        let mut table = Table::new(kind, 4);
        for key in [0, 1, u64::MAX] {
            assert!(!table.lookup(key), "{kind}: {key} found in empty table");
        }
        assert!(table.insert(5));
        assert!(table.lookup(5));
        for key in [0, 6, u64::MAX] {
            assert!(!table.lookup(key), "{kind}: {key} found next to 5");
        }
    }
}

#[test]
fn inserted_keys_are_found() {
    let keys = [1, 5, 9, 13, 17, 2, 3, u64::MAX, 0];
    for kind in TableKind::ALL {
        let mut table = Table::new(kind, 4);
        for key in keys {
            assert!(table.insert(key), "{kind}: {key} reported as present");
        }
        for key in keys {
            assert!(table.lookup(key), "{kind}: {key} not found");
            assert!(!table.insert(key), "{kind}: {key} inserted twice");
        }
        assert!(!table.lookup(4));
        assert_eq!(table.len(), keys.len());
        assert_eq!(table.stats().load, keys.len());
        table.check();
    }
}

#[test]
fn size_limit_applies_to_every_kind() {
    for kind in TableKind::ALL {
        let mut table = Table::new(kind, 1).with_size_limit(8);
        let mut failed = false;
        for key in 0..64 {
            match table.try_insert(key) {
                Ok(inserted) => assert!(inserted),
                Err(err) => {
                    assert_eq!(err.limit, 8);
                    assert!(!table.lookup(key));
                    failed = true;
                    break;
                }
            }
        }
        assert!(failed, "{kind}: 64 keys fit below the size limit");
        table.check();
    }
}

struct CheckedTable {
    dut: Table,
    ref_set: HashSet<u64>,
}

impl CheckedTable {
    fn new(kind: TableKind, size: usize) -> Self {
        CheckedTable {
            dut: Table::new(kind, size),
            ref_set: HashSet::default(),
        }
    }

    fn insert(&mut self, key: u64) -> bool {
        let ref_result = self.ref_set.insert(key);
        let dut_result = self.dut.insert(key);
        assert_eq!(ref_result, dut_result);
        ref_result
    }

    fn lookup(&self, key: u64) -> bool {
        let ref_result = self.ref_set.contains(&key);
        let dut_result = self.dut.lookup(key);
        assert_eq!(ref_result, dut_result);
        ref_result
    }

    fn check(&self) {
        self.dut.check();
        assert_eq!(self.dut.len(), self.ref_set.len());
        let stats = self.dut.stats();
        assert_eq!(stats.load, self.ref_set.len());
        assert!(stats.load <= stats.size);
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn test_suite(kind: TableKind, size: usize, mut rand_key: impl FnMut(&mut rand_pcg::Pcg64) -> u64) {
    let mut table = CheckedTable::new(kind, size);
    let mut rng = rand_pcg::Pcg64::seed_from_u64(25);
    let mut inserted = vec![];
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Insert: 1.0 => {
                let key = rand_key(&mut rng);
                if table.insert(key) {
                    inserted.push(key);
                }
            },
            InsertPresent: 0.2 => {
                if let Some(&key) = inserted.choose(&mut rng) {
                    assert!(!table.insert(key));
                }
            },
            LookupPresent: 0.5 => {
                if let Some(&key) = inserted.choose(&mut rng) {
                    assert!(table.lookup(key));
                }
            },
            LookupRandom: 0.5 => {
                let key = rand_key(&mut rng);
                table.lookup(key);
            },
            Check: 0.01 => {
                table.check();
            }
        };
    }
    table.check();
    println!("{kind}: {} keys, {}", table.ref_set.len(), table.dut.stats());
}

#[test]
fn test_suite_small_keys() {
    for kind in TableKind::ALL {
        test_suite(kind, 4, |rng| rng.gen_range(0..10_000));
    }
}

#[test]
fn test_suite_wide_keys() {
    for kind in TableKind::ALL {
        test_suite(kind, 1, |rng| rng.gen::<u64>() >> rng.gen_range(0..u64::BITS));
    }
}

#[test]
fn stats_dump_matches_kind() {
    let mut table = Table::new(TableKind::Cuckoo, 4);
    table.insert(1);
    let stats = table.stats().to_string();
    assert!(stats.contains("--- table 1 stats ---"));
    assert!(stats.contains("--- table 2 stats ---"));

    let mut table = Table::new(TableKind::Linear, 4);
    table.insert(1);
    let stats = table.stats().to_string();
    assert!(!stats.contains("--- table 1 stats ---"));
    assert!(stats.ends_with("--- end stats ---\n"));
}
