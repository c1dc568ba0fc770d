//! The editing facade: a store plus its undo history.
//!
//! [`RegionsManager`] is the single entry point UIs and importers mutate
//! through. Every mutation goes through the undo stack, and the cached
//! `children` lists are rebuilt after each structural change, including
//! undo and redo.

use crate::commands::ops::{
    EditCmd, InsertBatchCmd, InsertCmd, MoveBatchCmd, RemoveBatchCmd, RemoveBatchOptions,
    RemoveCmd,
};
use crate::commands::UndoStack;
use crate::error::{Error, Result};
use crate::region::{Region, RegionId};
use crate::store::hierarchy::rebuild_children;
use crate::store::paged::{InsertPos, PagedStore};

/// One requested relocation within a [`RegionsManager::move_regions`] batch.
#[derive(Debug, Clone)]
pub struct MoveEdit {
    /// Region to move
    pub id: RegionId,
    /// Destination page
    pub page: u32,
    /// Destination slot; `None` appends to the page
    pub idx: Option<usize>,
}

/// A paged store paired with its undo history.
#[derive(Debug, Default)]
pub struct RegionsManager {
    store: PagedStore,
    undo: UndoStack<PagedStore>,
}

impl RegionsManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &PagedStore {
        &self.store
    }

    /// Replace the store wholesale, e.g. after loading a project file.
    ///
    /// The undo history is cleared; edits from before a load make no sense
    /// against the loaded state.
    pub fn reset(&mut self, mut store: PagedStore) {
        rebuild_children(&mut store);
        self.store = store;
        self.undo.clear();
    }

    /// Insert one region at its declared page and index.
    ///
    /// An id collision is logged and ignored rather than treated as an
    /// error, so repeated UI events cannot duplicate a region.
    pub fn add_region(&mut self, region: Region) -> Result<()> {
        if self.store.contains_id(&region.id) {
            log::warn!("region {} already present, insert ignored", region.id);
            return Ok(());
        }
        let pos = InsertPos::At(region.idx);
        self.undo
            .push(&mut self.store, Box::new(InsertCmd::new(region, pos)))?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Insert a batch of regions as one undoable step.
    ///
    /// With `append` set, regions go to the end of their page lists in
    /// input order; otherwise each declared `idx` is honored. Colliding ids
    /// are dropped from the batch with a warning.
    pub fn add_regions(&mut self, regions: Vec<Region>, append: bool) -> Result<()> {
        let mut accepted = Vec::with_capacity(regions.len());
        for region in regions {
            if self.store.contains_id(&region.id) {
                log::warn!("region {} already present, dropped from batch", region.id);
            } else {
                accepted.push(region);
            }
        }
        if accepted.is_empty() {
            return Ok(());
        }
        self.undo
            .push(&mut self.store, Box::new(InsertBatchCmd::new(accepted, append)))?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Remove one region; its children are relinked to its parent.
    pub fn remove_region(&mut self, id: &RegionId) -> Result<()> {
        self.undo
            .push(&mut self.store, Box::new(RemoveCmd::new(id.clone())))?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Remove a batch of regions as one undoable step, with default policy
    /// (children of removed regions are not relinked).
    pub fn remove_regions(&mut self, ids: Vec<RegionId>) -> Result<()> {
        self.remove_regions_with(ids, RemoveBatchOptions::default())
    }

    /// Remove a batch of regions with an explicit relinking policy.
    pub fn remove_regions_with(
        &mut self,
        ids: Vec<RegionId>,
        options: RemoveBatchOptions,
    ) -> Result<()> {
        self.undo
            .push(&mut self.store, Box::new(RemoveBatchCmd::new(ids, options)))?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Replace the region at `(page, idx)` with `replacement`, which may
    /// also relocate it via its own `page`/`idx` fields.
    pub fn edit_region(&mut self, page: u32, idx: usize, replacement: Region) -> Result<()> {
        self.undo.push(
            &mut self.store,
            Box::new(EditCmd::new(page, idx, replacement)),
        )?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Replace a region in place, located by its id.
    pub fn replace_region(&mut self, replacement: Region) -> Result<()> {
        let (page, idx, _) = self
            .store
            .find_by_id(&replacement.id)
            .ok_or_else(|| Error::NotFound(format!("region {}", replacement.id)))?;
        self.edit_region(page, idx, replacement)
    }

    /// Move the region at a source position to another page and/or slot.
    ///
    /// Omitting `target_page` keeps the region on its page; omitting
    /// `target_idx` appends to the destination page.
    pub fn move_region(
        &mut self,
        source_page: u32,
        source_idx: usize,
        target_page: Option<u32>,
        target_idx: Option<usize>,
    ) -> Result<()> {
        let region = self
            .store
            .get(source_page, source_idx)
            .ok_or_else(|| Error::NotFound(format!("({source_page}, {source_idx})")))?;
        let id = region.id.clone();
        self.move_regions(vec![MoveEdit {
            id,
            page: target_page.unwrap_or(source_page),
            idx: target_idx,
        }])
    }

    /// Move several regions as one undoable step.
    ///
    /// Edits naming ids not in the store are dropped with a warning; the
    /// rest proceed.
    pub fn move_regions(&mut self, edits: Vec<MoveEdit>) -> Result<()> {
        let mut forward = Vec::with_capacity(edits.len());
        for edit in edits {
            match self.store.find_by_id(&edit.id) {
                Some((_, _, current)) => {
                    let mut moved = current.clone();
                    moved.page = edit.page;
                    let pos = match edit.idx {
                        Some(idx) => {
                            moved.idx = idx;
                            InsertPos::At(idx)
                        },
                        None => InsertPos::Append,
                    };
                    forward.push((moved, pos));
                },
                None => log::warn!("move dropped, {} not in store", edit.id),
            }
        }
        if forward.is_empty() {
            return Ok(());
        }
        let cmd = MoveBatchCmd::new(&self.store, forward);
        self.undo.push(&mut self.store, Box::new(cmd))?;
        rebuild_children(&mut self.store);
        Ok(())
    }

    /// Undo the most recent step. Returns `false` when the history is empty.
    pub fn undo(&mut self) -> Result<bool> {
        let changed = self.undo.undo(&mut self.store)?;
        if changed {
            rebuild_children(&mut self.store);
        }
        Ok(changed)
    }

    /// Redo the most recently undone step. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        let changed = self.undo.redo(&mut self.store)?;
        if changed {
            rebuild_children(&mut self.store);
        }
        Ok(changed)
    }

    /// True when at least one step can be undone.
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// True when at least one step can be redone.
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Drop all regions and the whole history.
    pub fn clear(&mut self) {
        self.store.clear();
        self.undo.clear();
    }
}
