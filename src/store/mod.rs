//! Region storage: the paged ordered store and hierarchy maintenance.

pub mod hierarchy;
pub mod paged;

pub use hierarchy::{child_map, format_path, path_to_root, rebuild_children};
pub use paged::{InsertPos, PagedStore};
