//! Fuzz the slotted page against an ordered-map model.
//!
//! Every operation sequence must keep the page structurally valid and
//! in agreement with `std::collections::BTreeMap`.

#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagemap::{BtreeError, NativeOrder, SlottedPage};
use zerocopy::{FromBytes, IntoBytes};

#[derive(Debug, Arbitrary)]
enum PageOp {
    Insert(u16, u32),
    Erase(u16),
    UpdateValue(u16, u32),
    Gc,
    Split,
}

fuzz_target!(|ops: Vec<PageOp>| {
    let mut page: SlottedPage<NativeOrder<u32>> = SlottedPage::new();
    page.set_level(0);
    let mut model: BTreeMap<u32, u32> = BTreeMap::new();

    for op in ops {
        match op {
            PageOp::Insert(k, v) => {
                let k = k as u32;
                match page.insert(k.as_bytes(), v.as_bytes()) {
                    Ok(()) => {
                        assert!(model.insert(k, v).is_none());
                    }
                    Err(err) => match err.downcast_ref::<BtreeError>() {
                        Some(BtreeError::KeyExists) => assert!(model.contains_key(&k)),
                        Some(BtreeError::NoSpace) => {}
                        other => panic!("unexpected insert failure: {other:?}"),
                    },
                }
            }
            PageOp::Erase(k) => {
                let k = k as u32;
                assert_eq!(page.erase_key(k.as_bytes()), model.remove(&k).is_some());
            }
            PageOp::UpdateValue(k, v) => {
                let k = k as u32;
                let updated = page.update_value(k.as_bytes(), v.as_bytes());
                if model.contains_key(&k) {
                    assert!(updated.is_ok());
                    model.insert(k, v);
                } else {
                    assert!(updated.is_err());
                }
            }
            PageOp::Gc => page.gc(),
            PageOp::Split => {
                if page.num_records() >= 2 {
                    let (p0, mut p1) = page.split(true);
                    assert!(!p0.is_empty() && !p1.is_empty());
                    assert!(p1.merge_from(&p0));
                    page.swap_contents(&mut p1);
                    page.set_level(0);
                }
            }
        }

        assert!(page.is_valid());
        assert_eq!(page.total_data_size(), page.calc_total_data_size());
        assert_eq!(page.num_records() as usize, model.len());
    }

    for (i, (&k, &v)) in model.iter().enumerate() {
        assert_eq!(u32::read_from_bytes(page.key_at(i as u16)).unwrap(), k);
        assert_eq!(u32::read_from_bytes(page.value_at(i as u16)).unwrap(), v);
    }
});
