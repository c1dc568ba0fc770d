//! Paged ordered store of regions.
//!
//! Regions live in per-page ordered lists keyed by page number. Page keys
//! keep first-seen insertion order, so iterating the store visits pages in
//! the order the user first touched them, not in numeric order. A page key
//! exists exactly while its list is non-empty.

use crate::error::{Error, Result};
use crate::region::{Region, RegionId};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Where to place a region within its page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPos {
    /// Insert at a specific index, clamped to the current list length
    At(usize),
    /// Insert after the current last element
    Append,
}

/// Ordered collection of regions grouped by page.
///
/// Every mutation keeps two invariants:
/// - each region's `page` and `idx` fields match its actual position;
/// - each page list is indexed contiguously from 0.
#[derive(Debug, Clone, Default)]
pub struct PagedStore {
    pages: IndexMap<u32, Vec<Region>>,
}

impl PagedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of regions across all pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// True when no page holds any region.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages currently holding regions.
    pub fn page_len(&self) -> usize {
        self.pages.len()
    }

    /// Page numbers in first-seen order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// The regions on `page`, or `None` when the page holds none.
    pub fn get_page(&self, page: u32) -> Option<&[Region]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    /// The region at `(page, idx)`.
    pub fn get(&self, page: u32, idx: usize) -> Option<&Region> {
        self.pages.get(&page).and_then(|rows| rows.get(idx))
    }

    /// Iterate all regions in store order (page first-seen order, then idx).
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.pages.values().flatten()
    }

    /// True when any region carries `id`.
    pub fn contains_id(&self, id: &RegionId) -> bool {
        self.iter().any(|r| &r.id == id)
    }

    /// Locate a region by id, returning its page, index and a reference.
    pub fn find_by_id(&self, id: &RegionId) -> Option<(u32, usize, &Region)> {
        for (&page, rows) in &self.pages {
            if let Some(idx) = rows.iter().position(|r| &r.id == id) {
                return Some((page, idx, &rows[idx]));
            }
        }
        None
    }

    /// Mutable access to a region by id.
    pub fn get_mut_by_id(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.pages
            .values_mut()
            .flatten()
            .find(|r| &r.id == id)
    }

    /// Map from region id to `(page, idx)` for every stored region.
    pub fn id_lookup(&self) -> HashMap<RegionId, (u32, usize)> {
        let mut m = HashMap::with_capacity(self.len());
        for (&page, rows) in &self.pages {
            for (idx, region) in rows.iter().enumerate() {
                m.insert(region.id.clone(), (page, idx));
            }
        }
        m
    }

    /// Insert a region on `page` at `pos` and return the placed position.
    ///
    /// A page without an entry gets a fresh list and the region lands at
    /// index 0 regardless of `pos`. An `At` index beyond the list length is
    /// clamped to an append. The touched page is reindexed afterwards.
    pub fn insert_at(&mut self, mut region: Region, page: u32, pos: InsertPos) -> (u32, usize) {
        region.page = page;
        let rows = self.pages.entry(page).or_default();
        let idx = match pos {
            InsertPos::Append => rows.len(),
            InsertPos::At(i) => i.min(rows.len()),
        };
        rows.insert(idx, region);
        self.reindex_page(page);
        (page, idx)
    }

    /// Remove and return the region at `(page, idx)`.
    ///
    /// The page key is dropped when its list becomes empty; otherwise the
    /// page is reindexed.
    pub fn remove_at(&mut self, page: u32, idx: usize) -> Result<Region> {
        let rows = self
            .pages
            .get_mut(&page)
            .ok_or_else(|| Error::NotFound(format!("page {page}")))?;
        if idx >= rows.len() {
            return Err(Error::NotFound(format!(
                "index {idx} on page {page} (len {})",
                rows.len()
            )));
        }
        let region = rows.remove(idx);
        if rows.is_empty() {
            self.pages.shift_remove(&page);
        } else {
            self.reindex_page(page);
        }
        Ok(region)
    }

    /// Remove a region by id, returning its former position with it.
    pub fn remove_by_id(&mut self, id: &RegionId) -> Result<(u32, usize, Region)> {
        let (page, idx, _) = self
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("region {id}")))?;
        let region = self.remove_at(page, idx)?;
        Ok((page, idx, region))
    }

    /// Rewrite `page` and `idx` fields on one page to match actual positions.
    pub fn reindex_page(&mut self, page: u32) {
        if let Some(rows) = self.pages.get_mut(&page) {
            for (idx, region) in rows.iter_mut().enumerate() {
                region.page = page;
                region.idx = idx;
            }
        }
    }

    /// Reindex every page. Used after bulk loads, where incoming `idx`
    /// values may be stale.
    pub fn reindex_all(&mut self) {
        let pages: Vec<u32> = self.pages.keys().copied().collect();
        for page in pages {
            self.reindex_page(page);
        }
    }

    /// Drop all regions.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Verify id uniqueness, index contiguity and the no-empty-page rule.
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for (&page, rows) in &self.pages {
            if rows.is_empty() {
                return Err(Error::IntegrityViolation(format!(
                    "page {page} present but empty"
                )));
            }
            for (idx, region) in rows.iter().enumerate() {
                if !seen.insert(region.id.clone()) {
                    return Err(Error::IntegrityViolation(format!(
                        "duplicate region id {}",
                        region.id
                    )));
                }
                if region.page != page || region.idx != idx {
                    return Err(Error::IntegrityViolation(format!(
                        "region {} records position ({}, {}) but sits at ({page}, {idx})",
                        region.id, region.page, region.idx
                    )));
                }
            }
        }
        Ok(())
    }
}
