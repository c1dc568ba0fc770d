//! Property tests: random command sequences never break the store
//! invariants, and undoing everything restores the initial state.

use pdf_markup::{MoveEdit, Point, Region, RegionCategory, RegionId, RegionsManager};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { page: u32, idx: usize },
    Remove { pick: usize },
    Move { pick: usize, page: u32, idx: usize },
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u32..4, 0usize..6).prop_map(|(page, idx)| Op::Insert { page, idx }),
        2 => (0usize..32).prop_map(|pick| Op::Remove { pick }),
        2 => (0usize..32, 0u32..4, 0usize..6)
            .prop_map(|(pick, page, idx)| Op::Move { pick, page, idx }),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

fn region(seq: usize, page: u32, idx: usize) -> Region {
    Region::draft("doc.pdf", page)
        .id(RegionId::from(format!("r{seq}")))
        .idx(idx)
        .coords(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .category(RegionCategory::Text)
        .finish()
        .unwrap()
}

fn nth_id(manager: &RegionsManager, pick: usize) -> Option<RegionId> {
    let ids: Vec<RegionId> = manager.store().iter().map(|r| r.id.clone()).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[pick % ids.len()].clone())
    }
}

proptest! {
    #[test]
    fn random_ops_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut manager = RegionsManager::new();
        let mut seq = 0usize;

        for op in ops {
            match op {
                Op::Insert { page, idx } => {
                    manager.add_region(region(seq, page, idx)).unwrap();
                    seq += 1;
                },
                Op::Remove { pick } => {
                    if let Some(id) = nth_id(&manager, pick) {
                        manager.remove_region(&id).unwrap();
                    }
                },
                Op::Move { pick, page, idx } => {
                    if let Some(id) = nth_id(&manager, pick) {
                        manager.move_regions(vec![MoveEdit { id, page, idx: Some(idx) }]).unwrap();
                    }
                },
                Op::Undo => { manager.undo().unwrap(); },
                Op::Redo => { manager.redo().unwrap(); },
            }
            manager.store().check_integrity().unwrap();
        }
    }

    #[test]
    fn undo_all_restores_empty_store(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut manager = RegionsManager::new();
        let mut seq = 0usize;

        for op in ops {
            match op {
                Op::Insert { page, idx } => {
                    manager.add_region(region(seq, page, idx)).unwrap();
                    seq += 1;
                },
                Op::Remove { pick } => {
                    if let Some(id) = nth_id(&manager, pick) {
                        manager.remove_region(&id).unwrap();
                    }
                },
                Op::Move { pick, page, idx } => {
                    if let Some(id) = nth_id(&manager, pick) {
                        manager.move_regions(vec![MoveEdit { id, page, idx: Some(idx) }]).unwrap();
                    }
                },
                // Skip history ops here; the point is unwinding a linear
                // run of edits.
                Op::Undo | Op::Redo => {},
            }
        }

        while manager.undo().unwrap() {}
        prop_assert!(manager.store().is_empty());
        prop_assert!(!manager.can_undo());
    }

    #[test]
    fn undo_redo_is_a_fixpoint(pages in proptest::collection::vec(0u32..3, 1..12)) {
        let mut manager = RegionsManager::new();
        for (seq, page) in pages.iter().enumerate() {
            manager.add_region(region(seq, *page, 0)).unwrap();
        }

        let before: Vec<(u32, String)> = manager
            .store()
            .iter()
            .map(|r| (r.page, r.id.to_string()))
            .collect();

        manager.undo().unwrap();
        manager.redo().unwrap();

        let after: Vec<(u32, String)> = manager
            .store()
            .iter()
            .map(|r| (r.page, r.id.to_string()))
            .collect();
        prop_assert_eq!(before, after);
        manager.store().check_integrity().unwrap();
    }
}
