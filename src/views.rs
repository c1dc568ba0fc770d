//! Read-only projections of the store: page listing, hierarchy tree and
//! field-scoped search.

use crate::region::{Region, RegionId};
use crate::store::paged::PagedStore;
use std::collections::{HashMap, HashSet};

/// Regions grouped by page, in store order.
///
/// Pages appear in first-seen order; this is a borrow of the store's own
/// layout, not a re-sort.
pub fn by_page_view(store: &PagedStore) -> Vec<(u32, &[Region])> {
    store
        .pages()
        .filter_map(|page| store.get_page(page).map(|rows| (page, rows)))
        .collect()
}

/// One node of the hierarchy projection.
#[derive(Debug)]
pub struct RegionNode<'a> {
    /// The region at this node
    pub region: &'a Region,
    /// Its children, in store order
    pub children: Vec<RegionNode<'a>>,
}

/// Project the store as a forest following parent pointers.
///
/// Roots are regions with no parent or with a parent no longer in the
/// store. Siblings keep store order. Cyclic pointers cannot recurse: a node
/// is expanded at most once.
pub fn hierarchy_view(store: &PagedStore) -> Vec<RegionNode<'_>> {
    let ids: HashSet<&RegionId> = store.iter().map(|r| &r.id).collect();
    let mut children_of: HashMap<&RegionId, Vec<&Region>> = HashMap::new();
    for region in store.iter() {
        if let Some(parent) = &region.parent {
            if ids.contains(parent) {
                children_of.entry(parent).or_default().push(region);
            }
        }
    }

    fn build<'a>(
        region: &'a Region,
        children_of: &HashMap<&RegionId, Vec<&'a Region>>,
        expanded: &mut HashSet<&'a RegionId>,
    ) -> RegionNode<'a> {
        let mut children = Vec::new();
        if let Some(kids) = children_of.get(&region.id) {
            for kid in kids {
                if expanded.insert(&kid.id) {
                    children.push(build(kid, children_of, expanded));
                }
            }
        }
        RegionNode { region, children }
    }

    let mut expanded: HashSet<&RegionId> = HashSet::new();
    let mut roots = Vec::new();
    for region in store.iter() {
        let is_root = match &region.parent {
            None => true,
            Some(parent) => !ids.contains(parent),
        };
        if is_root && expanded.insert(&region.id) {
            roots.push(build(region, &children_of, &mut expanded));
        }
    }
    roots
}

/// Which region fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Document,
    Page,
    Coordinates,
    Text,
    Category,
    Parent,
    Children,
    Description,
}

impl SearchField {
    /// Every searchable field.
    pub const ALL: [SearchField; 9] = [
        SearchField::Id,
        SearchField::Document,
        SearchField::Page,
        SearchField::Coordinates,
        SearchField::Text,
        SearchField::Category,
        SearchField::Parent,
        SearchField::Children,
        SearchField::Description,
    ];
}

fn field_matches(region: &Region, field: SearchField, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    match field {
        SearchField::Id => contains(region.id.as_str()),
        SearchField::Document => contains(&region.doc),
        // Page matches exactly, so "1" does not hit pages 10..19.
        SearchField::Page => region.page.to_string() == needle,
        SearchField::Coordinates => region
            .coords
            .iter()
            .any(|p| contains(&format!("{} {}", p.x, p.y))),
        SearchField::Text => contains(&region.text),
        SearchField::Category => contains(region.category.name()),
        SearchField::Parent => region
            .parent
            .as_ref()
            .is_some_and(|p| contains(p.as_str())),
        SearchField::Children => region.children.iter().any(|c| contains(c.as_str())),
        SearchField::Description => contains(&region.description),
    }
}

/// Find regions whose selected fields match `query`, returning positions in
/// store order.
///
/// Matching is case-insensitive substring, except `Page` which compares the
/// page number exactly. An empty query matches nothing.
pub fn search(store: &PagedStore, query: &str, fields: &[SearchField]) -> Vec<(u32, usize)> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for page in store.pages().collect::<Vec<_>>() {
        if let Some(rows) = store.get_page(page) {
            for (idx, region) in rows.iter().enumerate() {
                if fields.iter().any(|f| field_matches(region, *f, &needle)) {
                    hits.push((page, idx));
                }
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::RegionCategory;
    use crate::geometry::Point;
    use crate::region::Region;
    use crate::store::hierarchy::rebuild_children;
    use crate::store::paged::InsertPos;

    fn region(id: &str, page: u32, text: &str, parent: Option<&str>) -> Region {
        Region::draft("report.pdf", page)
            .id(RegionId::from(id))
            .coords(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ])
            .text(text)
            .category(RegionCategory::Text)
            .parent(parent.map(RegionId::from))
            .finish()
            .unwrap()
    }

    fn sample_store() -> PagedStore {
        let mut store = PagedStore::new();
        for r in [
            region("a", 0, "Alpha section", None),
            region("b", 0, "Beta paragraph", Some("a")),
            region("c", 1, "Gamma table", Some("a")),
            region("d", 1, "Delta footnote", Some("missing")),
        ] {
            let page = r.page;
            store.insert_at(r, page, InsertPos::Append);
        }
        rebuild_children(&mut store);
        store
    }

    #[test]
    fn test_by_page_view_order() {
        let store = sample_store();
        let view = by_page_view(&store);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].0, 0);
        assert_eq!(view[0].1.len(), 2);
    }

    #[test]
    fn test_hierarchy_view_roots_and_children() {
        let store = sample_store();
        let forest = hierarchy_view(&store);
        // "a" is a root; "d" has a dangling parent and also roots.
        let root_ids: Vec<&str> = forest.iter().map(|n| n.region.id.as_str()).collect();
        assert_eq!(root_ids, ["a", "d"]);
        let a = &forest[0];
        let kid_ids: Vec<&str> = a.children.iter().map(|n| n.region.id.as_str()).collect();
        assert_eq!(kid_ids, ["b", "c"]);
    }

    #[test]
    fn test_hierarchy_view_survives_cycle() {
        let mut store = PagedStore::new();
        for r in [region("x", 0, "", Some("y")), region("y", 0, "", Some("x"))] {
            store.insert_at(r, 0, InsertPos::Append);
        }
        let forest = hierarchy_view(&store);
        // Neither is a root; nothing to show, but no hang either.
        assert!(forest.is_empty());
    }

    #[test]
    fn test_search_text_case_insensitive() {
        let store = sample_store();
        let hits = search(&store, "ALPHA", &[SearchField::Text]);
        assert_eq!(hits, [(0, 0)]);
    }

    #[test]
    fn test_search_page_is_exact() {
        let store = sample_store();
        let hits = search(&store, "1", &[SearchField::Page]);
        assert_eq!(hits, [(1, 0), (1, 1)]);
        assert!(search(&store, "10", &[SearchField::Page]).is_empty());
    }

    #[test]
    fn test_search_empty_query_matches_nothing() {
        let store = sample_store();
        assert!(search(&store, "   ", &SearchField::ALL).is_empty());
    }

    #[test]
    fn test_search_parent_and_children() {
        let store = sample_store();
        let by_parent = search(&store, "a", &[SearchField::Parent]);
        assert_eq!(by_parent, [(0, 1), (1, 0)]);
        let by_children = search(&store, "c", &[SearchField::Children]);
        assert_eq!(by_children, [(0, 0)]);
    }
}
