// CLASSIFICATION: COMMUNITY
// Filename: range_maps.rs v0.2
// Date Modified: 2026-01-19
// Author: Lukas Bower

//! End-to-end scenarios for the interval map flavors.

use std::collections::HashMap;

use rand::Rng;
use socmap::{AddrLookup, RangeMap, ScalarRangeMap, Zone};

fn owners(map: &AddrLookup<i32>) -> Vec<(u64, u64, Vec<i32>)> {
    map.iter()
        .map(|(zone, regs)| {
            (
                zone.start,
                zone.stop - 1,
                regs.iter().map(|(owner, _)| *owner).collect(),
            )
        })
        .collect()
}

#[test]
fn device_registration_lifecycle() {
    let mut map: AddrLookup<i32> = AddrLookup::new();

    map.add(0..10, 0);
    assert_eq!(owners(&map), vec![(0, 9, vec![0])]);

    map.add(10..20, 1);
    map.add(20..25, 2);
    map.add(30..40, 3);
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0]),
            (10, 19, vec![1]),
            (20, 24, vec![2]),
            (30, 39, vec![3]),
        ]
    );

    map.add(0..15, 4);
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4]),
            (10, 14, vec![1, 4]),
            (15, 19, vec![1]),
            (20, 24, vec![2]),
            (30, 39, vec![3]),
        ]
    );

    map.add(0..15, 5);
    map.add(21..44, 6);
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4, 5]),
            (10, 14, vec![1, 4, 5]),
            (15, 19, vec![1]),
            (20, 20, vec![2]),
            (21, 24, vec![2, 6]),
            (25, 29, vec![6]),
            (30, 39, vec![3, 6]),
            (40, 43, vec![6]),
        ]
    );

    map.add(70..80, 7);
    map.add(0..100, 8);
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4, 5, 8]),
            (10, 14, vec![1, 4, 5, 8]),
            (15, 19, vec![1, 8]),
            (20, 20, vec![2, 8]),
            (21, 24, vec![2, 6, 8]),
            (25, 29, vec![6, 8]),
            (30, 39, vec![3, 6, 8]),
            (40, 43, vec![6, 8]),
            (44, 69, vec![8]),
            (70, 79, vec![7, 8]),
            (80, 99, vec![8]),
        ]
    );

    map.remove(21..44, &6);
    map.compact();
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4, 5, 8]),
            (10, 14, vec![1, 4, 5, 8]),
            (15, 19, vec![1, 8]),
            (20, 24, vec![2, 8]),
            (25, 29, vec![8]),
            (30, 39, vec![3, 8]),
            (40, 69, vec![8]),
            (70, 79, vec![7, 8]),
            (80, 99, vec![8]),
        ]
    );

    map.remove(0..100, &8);
    map.compact();
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4, 5]),
            (10, 14, vec![1, 4, 5]),
            (15, 19, vec![1]),
            (20, 24, vec![2]),
            (30, 39, vec![3]),
            (70, 79, vec![7]),
        ]
    );

    map.clear(12..21);
    assert_eq!(
        owners(&map),
        vec![
            (0, 9, vec![0, 4, 5]),
            (10, 11, vec![1, 4, 5]),
            (21, 24, vec![2]),
            (30, 39, vec![3]),
            (70, 79, vec![7]),
        ]
    );
}

#[test]
fn first_owner_wins_and_misses_stay_recoverable() {
    let mut map: AddrLookup<&str> = AddrLookup::new();
    map.add(0x2000_0000u64..0x2000_4000, "aic");
    map.add(0x2000_2000u64..0x2000_6000, "pmgr");
    let (owner, zone) = map.owner(0x2000_3000).expect("registered");
    assert_eq!(*owner, "aic");
    assert_eq!(zone, Zone::new(0x2000_0000, 0x2000_4000));
    assert!(map.owner(0x3000_0000).is_none());
    // Unregistered removal is tolerated silently.
    map.remove(0x1000u64..0x2000, &"ghost");
}

#[test]
fn scalar_assignments_split_and_miss_strictly() {
    let mut map = ScalarRangeMap::new();
    map.insert(0..5, 1);
    map.insert(5..10, 2);
    map.insert(4..8, 3);
    map.remove(2..4);
    let expect = [
        Some(1),
        Some(1),
        None,
        None,
        Some(3),
        Some(3),
        Some(3),
        Some(3),
        Some(2),
        Some(2),
        None,
    ];
    for (addr, want) in expect.iter().enumerate() {
        assert_eq!(map.get(addr as u64).copied(), *want, "address {addr}");
    }
    assert!(map.at(10).is_err());
    assert!(map.at(9).is_ok());
}

/// Drive the engine against a per-address model with random mutation
/// sequences; coverage and values must agree exactly afterwards.
#[test]
fn randomized_mutations_agree_with_model() {
    const SPACE: u64 = 0x100;
    let mut rng = rand::rng();
    for _ in 0..40 {
        let mut map: RangeMap<u32> = RangeMap::new();
        let mut model: HashMap<u64, u32> = HashMap::new();
        for op in 0..60 {
            let start = rng.random_range(0..SPACE);
            let stop = rng.random_range(start..=SPACE);
            let value = rng.random_range(0..8u32);
            match op % 3 {
                0 => {
                    map.replace(start..stop, value);
                    for addr in start..stop {
                        model.insert(addr, value);
                    }
                }
                1 => {
                    map.populate(start..stop, value).for_each(drop);
                    for addr in start..stop {
                        model.entry(addr).or_insert(value);
                    }
                }
                _ => {
                    map.clear(start..stop);
                    for addr in start..stop {
                        model.remove(&addr);
                    }
                }
            }
        }
        for addr in 0..SPACE {
            assert_eq!(
                map.lookup(addr).copied(),
                model.get(&addr).copied(),
                "address {addr:#x}"
            );
        }
        let zones: Vec<Zone> = map.zones().collect();
        for pair in zones.windows(2) {
            assert!(pair[0].stop <= pair[1].start, "unsorted or overlapping");
        }
    }
}

#[test]
fn compaction_is_idempotent_under_random_state() {
    let mut rng = rand::rng();
    let mut map: RangeMap<u32> = RangeMap::new();
    for _ in 0..50 {
        let start = rng.random_range(0..0x80u64);
        let stop = rng.random_range(start..=0x80);
        map.replace(start..stop, rng.random_range(0..3u32));
    }
    map.compact(|a, b| a == b, |v| *v == 0);
    let once: Vec<(Zone, u32)> = map.iter().map(|(z, v)| (z, *v)).collect();
    map.compact(|a, b| a == b, |v| *v == 0);
    let twice: Vec<(Zone, u32)> = map.iter().map(|(z, v)| (z, *v)).collect();
    assert_eq!(once, twice);
}
