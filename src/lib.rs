#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! # pdf_markup
//!
//! Selection data model and transactional editing engine for PDF region
//! annotation.
//!
//! Annotated regions live in a paged ordered store: per-page lists keyed by
//! page number, with pages kept in first-seen order. Every mutation is an
//! undoable command, and the parent/child hierarchy between regions is
//! maintained as cached projections of parent pointers. Projects persist as
//! a single JSON object, and extractor output can be ingested into the same
//! model.
//!
//! ## Example
//!
//! ```
//! use pdf_markup::{Point, Region, RegionCategory, RegionsManager};
//!
//! let mut manager = RegionsManager::new();
//! let region = Region::draft("paper.pdf", 0)
//!     .coords(vec![
//!         Point::new(72.0, 700.0),
//!         Point::new(540.0, 700.0),
//!         Point::new(540.0, 720.0),
//!         Point::new(72.0, 720.0),
//!     ])
//!     .text("Introduction")
//!     .category(RegionCategory::Title)
//!     .finish()?;
//! let id = region.id.clone();
//!
//! manager.add_region(region)?;
//! assert!(manager.store().contains_id(&id));
//!
//! manager.undo()?;
//! assert!(manager.store().is_empty());
//! # Ok::<(), pdf_markup::Error>(())
//! ```

// Core data model
pub mod category;
pub mod error;
pub mod geometry;
pub mod region;
pub mod store;

// Editing engine
pub mod commands;

// Projections and queries
pub mod context;
pub mod views;

// Persistence and ingestion
pub mod import;
pub mod persist;

// Background execution
pub mod worker;

pub use category::{CategoryInfo, RegionCategory};
pub use commands::{MoveEdit, RegionsManager, RemoveBatchOptions, UndoStack};
pub use error::{Error, Result};
pub use geometry::Point;
pub use region::{Region, RegionDraft, RegionId};
pub use store::{InsertPos, PagedStore};

/// Library version, from the package manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
