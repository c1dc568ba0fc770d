//! Surrounding-content extraction for a region.
//!
//! Given a target region, walk outward through the hierarchy collecting the
//! content of nearby regions: first the target's siblings, then its parent,
//! then the parent's siblings, then the grandparent, and so on up to the
//! root. The result feeds prompts or side panels that need the textual
//! neighborhood of a selection.

use crate::error::{Error, Result};
use crate::region::{Region, RegionId};
use crate::store::paged::PagedStore;
use std::collections::HashSet;

fn content_block(region: &Region) -> Option<String> {
    let text = region.text.trim();
    let description = region.description.trim();
    match (text.is_empty(), description.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("  - {text}")),
        (true, false) => Some(format!("  - {description}")),
        (false, false) => Some(format!("  - {text}\n  - {description}")),
    }
}

/// Collect content blocks from the hierarchy neighborhood of `id`.
///
/// Blocks appear nearest-first: siblings of the target, its parent, the
/// parent's siblings, the grandparent, outward until the root. The target
/// itself is never included. Regions without text or description are
/// skipped and do not count toward `max_nodes`.
pub fn contextualize(store: &PagedStore, id: &RegionId, max_nodes: usize) -> Result<Vec<String>> {
    if store.find_by_id(id).is_none() {
        return Err(Error::NotFound(format!("region {id}")));
    }

    let mut blocks = Vec::new();
    let mut visited: HashSet<RegionId> = HashSet::new();
    visited.insert(id.clone());

    let mut consider = |region: &Region, blocks: &mut Vec<String>| {
        if blocks.len() >= max_nodes || !visited.insert(region.id.clone()) {
            return;
        }
        if let Some(block) = content_block(region) {
            blocks.push(block);
        }
    };

    let mut current = id.clone();
    // Parent-pointer cycles cannot walk further than the store is tall.
    for _ in 0..store.len() {
        if blocks.len() >= max_nodes {
            break;
        }
        let Some((_, _, region)) = store.find_by_id(&current) else {
            break;
        };
        let Some(parent_id) = region.parent.clone() else {
            break;
        };
        let Some((_, _, parent)) = store.find_by_id(&parent_id) else {
            // Dangling pointer: the neighborhood ends here.
            break;
        };

        for sibling in store.iter().filter(|r| r.parent.as_ref() == Some(&parent_id)) {
            consider(sibling, &mut blocks);
        }
        consider(parent, &mut blocks);
        current = parent_id;
    }

    Ok(blocks)
}

/// Join context blocks into one displayable string.
pub fn format_context(blocks: &[String]) -> String {
    blocks.join("\n\n")
}
