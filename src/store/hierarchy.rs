//! Parent-pointer hierarchy maintenance and walks.
//!
//! The hierarchy is encoded by each region's `parent` field. The `children`
//! lists are a cached projection of those pointers and are rebuilt wholesale
//! after every structural change rather than edited incrementally. Parent
//! pointers to ids no longer in the store are tolerated everywhere: such
//! regions act as roots until their parent reappears (for example via undo).

use crate::error::{Error, Result};
use crate::region::RegionId;
use crate::store::paged::PagedStore;
use std::collections::{HashMap, HashSet};

/// Rebuild every region's `children` list from the parent pointers.
///
/// Children appear in store order. Pointers to absent parents contribute
/// nothing; they are left in place on the child.
pub fn rebuild_children(store: &mut PagedStore) {
    let ids: HashSet<RegionId> = store.iter().map(|r| r.id.clone()).collect();

    let mut by_parent: HashMap<RegionId, Vec<RegionId>> = HashMap::new();
    for region in store.iter() {
        if let Some(parent) = &region.parent {
            if ids.contains(parent) {
                by_parent
                    .entry(parent.clone())
                    .or_default()
                    .push(region.id.clone());
            }
        }
    }

    let region_ids: Vec<RegionId> = store.iter().map(|r| r.id.clone()).collect();
    for id in region_ids {
        if let Some(region) = store.get_mut_by_id(&id) {
            region.children = by_parent.remove(&id).unwrap_or_default();
        }
    }
}

/// Map each parent id to its children's ids, in store order.
pub fn child_map(store: &PagedStore) -> HashMap<RegionId, Vec<RegionId>> {
    let ids: HashSet<&RegionId> = store.iter().map(|r| &r.id).collect();
    let mut m: HashMap<RegionId, Vec<RegionId>> = HashMap::new();
    for region in store.iter() {
        if let Some(parent) = &region.parent {
            if ids.contains(parent) {
                m.entry(parent.clone()).or_default().push(region.id.clone());
            }
        }
    }
    m
}

/// Walk parent pointers from `id` up to a root.
///
/// Returns the ancestry chain ordered root first, ending at `id`. A
/// dangling parent pointer ends the walk there, as if the region were a
/// root. The walk is bounded by the store size; exceeding it means the
/// pointers form a cycle.
pub fn path_to_root(store: &PagedStore, id: &RegionId) -> Result<Vec<RegionId>> {
    let (_, _, mut current) = store
        .find_by_id(id)
        .ok_or_else(|| Error::NotFound(format!("region {id}")))?;

    let bound = store.len();
    let mut path = vec![current.id.clone()];
    while let Some(parent) = &current.parent {
        if path.len() > bound {
            return Err(Error::CycleDetected(id.to_string()));
        }
        match store.find_by_id(parent) {
            Some((_, _, region)) => {
                path.push(region.id.clone());
                current = region;
            },
            // Dangling pointer: treat the current node as the root.
            None => break,
        }
    }
    path.reverse();
    Ok(path)
}

/// Render the ancestry of `id` as a breadcrumb string, root first.
///
/// Each step shows the region's category and the first few words of its
/// text. Regions without text fall back to their id.
pub fn format_path(store: &PagedStore, id: &RegionId) -> Result<String> {
    let path = path_to_root(store, id)?;

    let mut parts = Vec::with_capacity(path.len());
    for step in &path {
        if let Some((_, _, region)) = store.find_by_id(step) {
            let snippet: String = region
                .text
                .split_whitespace()
                .take(4)
                .collect::<Vec<_>>()
                .join(" ");
            if snippet.is_empty() {
                parts.push(format!("[{}] {}", region.category, region.id));
            } else {
                parts.push(format!("[{}] {}", region.category, snippet));
            }
        }
    }
    Ok(parts.join(" > "))
}
