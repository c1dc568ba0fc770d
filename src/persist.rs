//! Project persistence.
//!
//! A project file is a single JSON object mapping page numbers (as decimal
//! strings) to arrays of region records, in store order. Loading is
//! forgiving: rows that fail to deserialize are logged and skipped, stale
//! `idx` values are corrected, and the cached `children` lists are rebuilt
//! from the parent pointers rather than trusted.

use crate::error::Result;
use crate::region::Region;
use crate::store::hierarchy::rebuild_children;
use crate::store::paged::{InsertPos, PagedStore};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serialize the store into the project JSON shape.
pub fn to_json_value(store: &PagedStore) -> Result<Value> {
    let mut root = Map::new();
    for page in store.pages() {
        if let Some(rows) = store.get_page(page) {
            root.insert(page.to_string(), serde_json::to_value(rows)?);
        }
    }
    Ok(Value::Object(root))
}

/// Rebuild a store from the project JSON shape.
///
/// Unparseable page keys and malformed rows are skipped with a warning.
/// Positions are taken from array order, not from the stored `idx` fields.
pub fn from_json_value(value: &Value) -> Result<PagedStore> {
    let mut store = PagedStore::new();
    let Some(root) = value.as_object() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "project root is not an object",
        )
        .into());
    };

    for (key, rows) in root {
        let Ok(page) = key.parse::<u32>() else {
            log::warn!("skipping page with unparseable key {key:?}");
            continue;
        };
        let Some(rows) = rows.as_array() else {
            log::warn!("skipping page {page}: value is not an array");
            continue;
        };
        for row in rows {
            match serde_json::from_value::<Region>(row.clone()) {
                Ok(region) => {
                    store.insert_at(region, page, InsertPos::Append);
                },
                Err(e) => log::warn!("skipping malformed region on page {page}: {e}"),
            }
        }
    }

    store.reindex_all();
    rebuild_children(&mut store);
    Ok(store)
}

/// Write the store to a project file.
pub fn save_project(store: &PagedStore, path: impl AsRef<Path>) -> Result<()> {
    let value = to_json_value(store)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &value)?;
    Ok(())
}

/// Read a store from a project file.
pub fn load_project(path: impl AsRef<Path>) -> Result<PagedStore> {
    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    from_json_value(&value)
}
