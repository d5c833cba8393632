//! Fuzz the whole tree against `std::collections::BTreeMap`.

#![no_main]

use std::collections::BTreeMap as StdBTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagemap::BtreeMap;

#[derive(Debug, Arbitrary)]
enum TreeOp {
    Insert(u16, u32),
    Erase(u16),
    LowerBound(u16),
    Clear,
}

fuzz_target!(|ops: Vec<TreeOp>| {
    let mut map: BtreeMap<u32, u32> = BtreeMap::new();
    let mut oracle: StdBTreeMap<u32, u32> = StdBTreeMap::new();

    for op in ops {
        match op {
            TreeOp::Insert(k, v) => {
                let k = k as u32;
                let inserted = map.insert(k, v).is_ok();
                let fresh = !oracle.contains_key(&k);
                if fresh {
                    oracle.insert(k, v);
                }
                assert_eq!(inserted, fresh);
            }
            TreeOp::Erase(k) => {
                let k = k as u32;
                assert_eq!(map.erase(k), oracle.remove(&k).is_some());
            }
            TreeOp::LowerBound(k) => {
                let k = k as u32;
                let it = map.lower_bound(k);
                match oracle.range(k..).next() {
                    Some((&ek, &ev)) => {
                        assert_eq!(it.key(), ek);
                        assert_eq!(it.value(), ev);
                    }
                    None => assert!(it.is_end()),
                }
            }
            TreeOp::Clear => {
                map.clear();
                oracle.clear();
            }
        }

        assert!(map.is_valid());
        assert_eq!(map.len(), oracle.len());
    }

    let got: Vec<(u32, u32)> = map.iter().collect();
    let expected: Vec<(u32, u32)> = oracle.into_iter().collect();
    assert_eq!(got, expected);
});
