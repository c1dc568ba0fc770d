//! The concrete command set over the paged store.
//!
//! Single-item commands are all-or-nothing: the first error aborts the
//! command before anything is mutated, and propagates. Batch commands are
//! best-effort: items that cannot be resolved are skipped with a warning and
//! the rest proceed.

use crate::commands::Command;
use crate::error::{Error, Result};
use crate::region::{Region, RegionId};
use crate::store::paged::{InsertPos, PagedStore};

/// Insert one region at a declared position.
pub struct InsertCmd {
    region: Region,
    pos: InsertPos,
    placed: Option<(u32, usize)>,
}

impl InsertCmd {
    /// Insert `region` on its declared page at `pos`.
    pub fn new(region: Region, pos: InsertPos) -> Self {
        Self {
            region,
            pos,
            placed: None,
        }
    }
}

impl Command<PagedStore> for InsertCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        let page = self.region.page;
        self.placed = Some(store.insert_at(self.region.clone(), page, self.pos));
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        let (page, idx) = self
            .placed
            .take()
            .ok_or_else(|| Error::IntegrityViolation("insert undone before applied".to_string()))?;
        store.remove_at(page, idx)?;
        Ok(())
    }

    fn label(&self) -> String {
        format!("insert region {} on page {}", self.region.id, self.region.page)
    }
}

/// Insert several regions, each on its declared page.
///
/// With `append` set, regions land at the end of their page lists in input
/// order; otherwise each region's declared `idx` is honored.
pub struct InsertBatchCmd {
    regions: Vec<Region>,
    append: bool,
    placed: Vec<(u32, usize)>,
}

impl InsertBatchCmd {
    pub fn new(regions: Vec<Region>, append: bool) -> Self {
        Self {
            regions,
            append,
            placed: Vec::new(),
        }
    }
}

impl Command<PagedStore> for InsertBatchCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        self.placed.clear();
        for region in &self.regions {
            let pos = if self.append {
                InsertPos::Append
            } else {
                InsertPos::At(region.idx)
            };
            let page = region.page;
            self.placed.push(store.insert_at(region.clone(), page, pos));
        }
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        // Reverse order unwinds each insertion from the exact state it
        // created, so recorded positions stay valid.
        for (page, idx) in self.placed.drain(..).rev() {
            if let Err(e) = store.remove_at(page, idx) {
                log::warn!("batch insert undo skipped ({page}, {idx}): {e}");
            }
        }
        Ok(())
    }

    fn label(&self) -> String {
        format!("insert {} regions", self.regions.len())
    }
}

/// Remove one region, relinking its children to their grandparent.
pub struct RemoveCmd {
    id: RegionId,
    removed: Option<(u32, usize, Region)>,
    relinked: Vec<RegionId>,
}

impl RemoveCmd {
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            removed: None,
            relinked: Vec::new(),
        }
    }
}

impl Command<PagedStore> for RemoveCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        let (page, idx, region) = store.remove_by_id(&self.id)?;

        // Children of the removed region move up to its parent.
        self.relinked = store
            .iter()
            .filter(|r| r.parent.as_ref() == Some(&self.id))
            .map(|r| r.id.clone())
            .collect();
        for child in &self.relinked {
            if let Some(r) = store.get_mut_by_id(child) {
                r.parent = region.parent.clone();
            }
        }

        self.removed = Some((page, idx, region));
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        let (page, idx, region) = self
            .removed
            .take()
            .ok_or_else(|| Error::IntegrityViolation("remove undone before applied".to_string()))?;
        for child in self.relinked.drain(..) {
            if let Some(r) = store.get_mut_by_id(&child) {
                r.parent = Some(self.id.clone());
            }
        }
        store.insert_at(region, page, InsertPos::At(idx));
        Ok(())
    }

    fn label(&self) -> String {
        format!("remove region {}", self.id)
    }
}

/// Policy knobs for [`RemoveBatchCmd`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveBatchOptions {
    /// Relink children of each removed region to its parent, as the
    /// single-region removal does. Off by default: bulk deletion usually
    /// removes whole subtrees, where relinking would only churn pointers.
    pub reparent_orphans: bool,
}

/// Remove several regions by id, best-effort.
pub struct RemoveBatchCmd {
    ids: Vec<RegionId>,
    options: RemoveBatchOptions,
    removed: Vec<(u32, usize, Region)>,
    relinked: Vec<(RegionId, Option<RegionId>)>,
}

impl RemoveBatchCmd {
    pub fn new(ids: Vec<RegionId>, options: RemoveBatchOptions) -> Self {
        Self {
            ids,
            options,
            removed: Vec::new(),
            relinked: Vec::new(),
        }
    }
}

impl Command<PagedStore> for RemoveBatchCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        self.removed.clear();
        self.relinked.clear();
        for id in &self.ids {
            match store.remove_by_id(id) {
                Ok((page, idx, region)) => {
                    if self.options.reparent_orphans {
                        let children: Vec<RegionId> = store
                            .iter()
                            .filter(|r| r.parent.as_ref() == Some(id))
                            .map(|r| r.id.clone())
                            .collect();
                        for child in children {
                            if let Some(r) = store.get_mut_by_id(&child) {
                                self.relinked.push((child.clone(), r.parent.clone()));
                                r.parent = region.parent.clone();
                            }
                        }
                    }
                    self.removed.push((page, idx, region));
                },
                Err(e) => log::warn!("batch remove skipped {id}: {e}"),
            }
        }
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        // Reinsert in reverse removal order so each recorded position is
        // valid at the moment it is used.
        for (page, idx, region) in self.removed.drain(..).rev() {
            store.insert_at(region, page, InsertPos::At(idx));
        }
        for (child, old_parent) in self.relinked.drain(..).rev() {
            if let Some(r) = store.get_mut_by_id(&child) {
                r.parent = old_parent;
            }
        }
        Ok(())
    }

    fn label(&self) -> String {
        format!("remove {} regions", self.ids.len())
    }
}

/// Replace the region at a source position with a new record.
///
/// The replacement's own `page` and `idx` fields declare where it goes, so
/// an edit may simultaneously change content and move the region.
pub struct EditCmd {
    source: (u32, usize),
    replacement: Region,
    old: Option<Region>,
    new_placed: Option<(u32, usize)>,
}

impl EditCmd {
    pub fn new(source_page: u32, source_idx: usize, replacement: Region) -> Self {
        Self {
            source: (source_page, source_idx),
            replacement,
            old: None,
            new_placed: None,
        }
    }
}

impl Command<PagedStore> for EditCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        let (page, idx) = self.source;
        let old = store.remove_at(page, idx)?;
        let target_page = self.replacement.page;
        let target_idx = self.replacement.idx;
        self.new_placed =
            Some(store.insert_at(self.replacement.clone(), target_page, InsertPos::At(target_idx)));
        self.old = Some(old);
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        let (page, idx) = self
            .new_placed
            .take()
            .ok_or_else(|| Error::IntegrityViolation("edit undone before applied".to_string()))?;
        store.remove_at(page, idx)?;
        let old = self
            .old
            .take()
            .ok_or_else(|| Error::IntegrityViolation("edit lost its prior record".to_string()))?;
        let (source_page, source_idx) = self.source;
        store.insert_at(old, source_page, InsertPos::At(source_idx));
        Ok(())
    }

    fn label(&self) -> String {
        format!(
            "edit region at ({}, {}) -> {}",
            self.source.0, self.source.1, self.replacement.id
        )
    }
}

/// Move several regions at once, each to a declared destination.
///
/// Destinations are carried on the replacement records: `page` names the
/// target page and the paired [`InsertPos`] the target slot. The move runs
/// in two phases, removing every affected region first and reinserting all
/// of them afterwards, so edits within the batch cannot shift each other's
/// source positions.
pub struct MoveBatchCmd {
    forward: Vec<(Region, InsertPos)>,
    inverse: Vec<(Region, InsertPos)>,
}

impl MoveBatchCmd {
    /// Build a move from destination records, capturing the inverse from the
    /// store's current state before anything runs.
    ///
    /// Edits whose id is not in `store` get no inverse and are skipped by
    /// both directions.
    pub fn new(store: &PagedStore, forward: Vec<(Region, InsertPos)>) -> Self {
        let mut inverse = Vec::with_capacity(forward.len());
        for (edit, _) in &forward {
            match store.find_by_id(&edit.id) {
                Some((page, idx, current)) => {
                    let mut back = current.clone();
                    back.page = page;
                    back.idx = idx;
                    inverse.push((back, InsertPos::At(idx)));
                },
                None => log::warn!("move has no source for {}; it will be skipped", edit.id),
            }
        }
        Self { forward, inverse }
    }

    fn apply_edits(store: &mut PagedStore, edits: &[(Region, InsertPos)]) {
        // Phase 1: pull every moved region out, so later inserts see
        // positions free of the regions still in flight.
        let mut resolved = Vec::with_capacity(edits.len());
        for (edit, pos) in edits {
            match store.remove_by_id(&edit.id) {
                Ok(_) => resolved.push((edit, *pos)),
                Err(e) => log::warn!("move skipped {}: {e}", edit.id),
            }
        }
        // Phase 2: reinsert at the declared destinations.
        for (edit, pos) in resolved {
            let page = edit.page;
            store.insert_at(edit.clone(), page, pos);
        }
    }
}

impl Command<PagedStore> for MoveBatchCmd {
    fn apply(&mut self, store: &mut PagedStore) -> Result<()> {
        Self::apply_edits(store, &self.forward);
        Ok(())
    }

    fn unapply(&mut self, store: &mut PagedStore) -> Result<()> {
        Self::apply_edits(store, &self.inverse);
        Ok(())
    }

    fn label(&self) -> String {
        format!("move {} regions", self.forward.len())
    }
}
