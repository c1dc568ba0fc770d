//! End-to-end tests of the editing engine: every command through the
//! manager, with undo and redo.

use pdf_markup::{MoveEdit, Point, Region, RegionCategory, RegionId, RegionsManager};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn region(id: &str, page: u32, idx: usize) -> Region {
    Region::draft("paper.pdf", page)
        .id(RegionId::from(id))
        .idx(idx)
        .coords(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(0.0, 50.0),
        ])
        .text(format!("text of {id}"))
        .category(RegionCategory::Text)
        .finish()
        .unwrap()
}

fn child_of(id: &str, page: u32, idx: usize, parent: &str) -> Region {
    let mut r = region(id, page, idx);
    r.parent = Some(RegionId::from(parent));
    r
}

fn page_ids(manager: &RegionsManager, page: u32) -> Vec<String> {
    manager
        .store()
        .get_page(page)
        .map(|rows| rows.iter().map(|r| r.id.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn test_insert_then_undo_redo() {
    init_logs();
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_region(region("b", 0, 0)).unwrap();
    assert_eq!(page_ids(&m, 0), ["b", "a"]);

    assert!(m.undo().unwrap());
    assert_eq!(page_ids(&m, 0), ["a"]);
    assert!(m.redo().unwrap());
    assert_eq!(page_ids(&m, 0), ["b", "a"]);
    m.store().check_integrity().unwrap();
}

#[test]
fn test_duplicate_id_insert_is_ignored() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_region(region("a", 1, 0)).unwrap();
    assert_eq!(m.store().len(), 1);
    // The ignored insert did not create an undo step.
    assert!(m.undo().unwrap());
    assert!(!m.can_undo());
}

#[test]
fn test_remove_relinks_children_and_undo_restores() {
    let mut m = RegionsManager::new();
    m.add_region(region("root", 0, 0)).unwrap();
    m.add_region(child_of("mid", 0, 1, "root")).unwrap();
    m.add_region(child_of("leaf1", 0, 2, "mid")).unwrap();
    m.add_region(child_of("leaf2", 1, 0, "mid")).unwrap();

    m.remove_region(&RegionId::from("mid")).unwrap();
    let store = m.store();
    assert!(!store.contains_id(&RegionId::from("mid")));
    // Children moved up to the grandparent.
    let (_, _, leaf1) = store.find_by_id(&RegionId::from("leaf1")).unwrap();
    assert_eq!(leaf1.parent, Some(RegionId::from("root")));
    let (_, _, root) = store.find_by_id(&RegionId::from("root")).unwrap();
    assert_eq!(root.children, vec![RegionId::from("leaf1"), RegionId::from("leaf2")]);

    assert!(m.undo().unwrap());
    let store = m.store();
    let (page, idx, mid) = store.find_by_id(&RegionId::from("mid")).unwrap();
    assert_eq!((page, idx), (0, 1));
    assert_eq!(mid.children, vec![RegionId::from("leaf1"), RegionId::from("leaf2")]);
    let (_, _, leaf1) = store.find_by_id(&RegionId::from("leaf1")).unwrap();
    assert_eq!(leaf1.parent, Some(RegionId::from("mid")));
    store.check_integrity().unwrap();
}

#[test]
fn test_batch_insert_into_fresh_page_and_undo() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_regions(vec![region("x", 3, 0), region("y", 3, 0)], true)
        .unwrap();

    assert_eq!(page_ids(&m, 3), ["x", "y"]);
    assert_eq!(m.store().pages().collect::<Vec<_>>(), [0, 3]);

    assert!(m.undo().unwrap());
    assert!(m.store().get_page(3).is_none());
    assert_eq!(m.store().pages().collect::<Vec<_>>(), [0]);
}

#[test]
fn test_batch_remove_skips_missing_and_undo_restores_order() {
    let mut m = RegionsManager::new();
    for (id, idx) in [("a", 0), ("b", 1), ("c", 2), ("d", 3)] {
        m.add_region(region(id, 0, idx)).unwrap();
    }

    m.remove_regions(vec![
        RegionId::from("c"),
        RegionId::from("missing"),
        RegionId::from("a"),
    ])
    .unwrap();
    assert_eq!(page_ids(&m, 0), ["b", "d"]);

    assert!(m.undo().unwrap());
    assert_eq!(page_ids(&m, 0), ["a", "b", "c", "d"]);
    m.store().check_integrity().unwrap();
}

#[test]
fn test_batch_remove_does_not_relink_by_default() {
    let mut m = RegionsManager::new();
    m.add_region(region("root", 0, 0)).unwrap();
    m.add_region(child_of("kid", 0, 1, "root")).unwrap();

    m.remove_regions(vec![RegionId::from("root")]).unwrap();
    let (_, _, kid) = m.store().find_by_id(&RegionId::from("kid")).unwrap();
    // The pointer dangles; the region now acts as a root.
    assert_eq!(kid.parent, Some(RegionId::from("root")));
    assert!(kid.children.is_empty());
}

#[test]
fn test_edit_region_replaces_and_undo_restores() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();

    let mut replacement = region("a", 0, 0);
    replacement.text = "rewritten".to_string();
    replacement.category = RegionCategory::Title;
    m.edit_region(0, 0, replacement).unwrap();

    let (_, _, a) = m.store().find_by_id(&RegionId::from("a")).unwrap();
    assert_eq!(a.text, "rewritten");
    assert_eq!(a.category, RegionCategory::Title);

    assert!(m.undo().unwrap());
    let (_, _, a) = m.store().find_by_id(&RegionId::from("a")).unwrap();
    assert_eq!(a.text, "text of a");
}

#[test]
fn test_replace_region_locates_by_id() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_region(region("b", 0, 1)).unwrap();

    let mut replacement = region("b", 0, 1);
    replacement.description = "checked".to_string();
    m.replace_region(replacement).unwrap();

    let (_, _, b) = m.store().find_by_id(&RegionId::from("b")).unwrap();
    assert_eq!(b.description, "checked");
    assert_eq!(page_ids(&m, 0), ["a", "b"]);
}

#[test]
fn test_replace_missing_region_errors() {
    let mut m = RegionsManager::new();
    assert!(m.replace_region(region("ghost", 0, 0)).is_err());
}

#[test]
fn test_move_region_to_other_page_appends_by_default() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_region(region("b", 1, 0)).unwrap();

    m.move_region(0, 0, Some(1), None).unwrap();
    assert!(m.store().get_page(0).is_none());
    assert_eq!(page_ids(&m, 1), ["b", "a"]);

    assert!(m.undo().unwrap());
    assert_eq!(page_ids(&m, 0), ["a"]);
    assert_eq!(page_ids(&m, 1), ["b"]);
}

#[test]
fn test_move_batch_swaps_across_pages_and_undoes() {
    let mut m = RegionsManager::new();
    m.add_region(region("x", 0, 0)).unwrap();
    m.add_region(region("y", 1, 0)).unwrap();

    m.move_regions(vec![
        MoveEdit {
            id: RegionId::from("x"),
            page: 1,
            idx: Some(0),
        },
        MoveEdit {
            id: RegionId::from("y"),
            page: 0,
            idx: Some(0),
        },
    ])
    .unwrap();
    assert_eq!(page_ids(&m, 1), ["x"]);
    assert_eq!(page_ids(&m, 0), ["y"]);

    assert!(m.undo().unwrap());
    assert_eq!(page_ids(&m, 0), ["x"]);
    assert_eq!(page_ids(&m, 1), ["y"]);
    m.store().check_integrity().unwrap();

    assert!(m.redo().unwrap());
    assert_eq!(page_ids(&m, 1), ["x"]);
}

#[test]
fn test_move_within_page_reorders() {
    let mut m = RegionsManager::new();
    for (id, idx) in [("a", 0), ("b", 1), ("c", 2)] {
        m.add_region(region(id, 0, idx)).unwrap();
    }

    m.move_region(0, 2, None, Some(0)).unwrap();
    assert_eq!(page_ids(&m, 0), ["c", "a", "b"]);

    assert!(m.undo().unwrap());
    assert_eq!(page_ids(&m, 0), ["a", "b", "c"]);
}

#[test]
fn test_new_command_truncates_redo_branch() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_region(region("b", 0, 1)).unwrap();
    assert!(m.undo().unwrap());
    assert!(m.can_redo());

    m.add_region(region("c", 0, 1)).unwrap();
    assert!(!m.can_redo());
    assert!(!m.redo().unwrap());
    assert_eq!(page_ids(&m, 0), ["a", "c"]);
}

#[test]
fn test_undo_exhausts_to_empty_store() {
    let mut m = RegionsManager::new();
    m.add_region(region("a", 0, 0)).unwrap();
    m.add_regions(vec![region("b", 1, 0), region("c", 2, 0)], true)
        .unwrap();
    m.remove_region(&RegionId::from("a")).unwrap();

    while m.undo().unwrap() {}
    assert!(m.store().is_empty());
    assert!(!m.can_undo());
}
