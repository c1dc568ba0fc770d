//! The region record: one annotated area on one document page.
//!
//! A [`Region`] is the unit everything else in the crate operates on. Its
//! field names and order match the persisted project shape, so the struct
//! serializes directly into project files without an intermediate DTO.

use crate::category::RegionCategory;
use crate::error::Result;
use crate::geometry::{self, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a region, unique across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RegionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One annotated region on a document page.
///
/// `page` and `idx` mirror the region's position in the store. They are
/// authoritative only at the moment a record enters the store; afterwards the
/// store keeps them synchronized on every structural change.
///
/// `children` is a cached projection of the `parent` pointers held by other
/// regions. It is rebuilt wholesale after structural mutations and never
/// edited by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Unique region id
    #[serde(rename = "id_")]
    pub id: RegionId,
    /// Source document name
    pub doc: String,
    /// Page number the region belongs to
    pub page: u32,
    /// Position of this region within its page's ordered list
    pub idx: usize,
    /// Polygon vertices in document space
    pub coords: Vec<Point>,
    /// Extracted or hand-entered text content
    #[serde(default)]
    pub text: String,
    /// Assigned category
    pub category: RegionCategory,
    /// Base64-encoded thumbnail, empty when none was captured.
    ///
    /// Always a string on the wire; `null` and missing values are read
    /// back as empty.
    #[serde(default, deserialize_with = "nullable_string")]
    pub image: String,
    /// Id of the parent region, if any
    #[serde(default)]
    pub parent: Option<RegionId>,
    /// Cached ids of regions whose `parent` points here
    #[serde(default)]
    pub children: Vec<RegionId>,
    /// Free-form annotation note
    #[serde(default)]
    pub description: String,
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Region {
    /// Start building a region for `doc` on `page`.
    pub fn draft(doc: impl Into<String>, page: u32) -> RegionDraft {
        RegionDraft {
            id: None,
            doc: doc.into(),
            page,
            idx: 0,
            coords: Vec::new(),
            text: String::new(),
            category: RegionCategory::Unknown,
            image: String::new(),
            parent: None,
            description: String::new(),
        }
    }

    /// True when the region carries neither text nor a description.
    pub fn is_content_empty(&self) -> bool {
        self.text.trim().is_empty() && self.description.trim().is_empty()
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Builder for a [`Region`], validating geometry on finish.
#[derive(Debug, Clone)]
pub struct RegionDraft {
    id: Option<RegionId>,
    doc: String,
    page: u32,
    idx: usize,
    coords: Vec<Point>,
    text: String,
    category: RegionCategory,
    image: String,
    parent: Option<RegionId>,
    description: String,
}

/// Minimum polygon area accepted when finalizing a draft. Anything smaller is
/// an accidental click, not a selection.
pub const MIN_REGION_AREA: f64 = 1.0;

impl RegionDraft {
    /// Use a caller-provided id instead of generating one.
    pub fn id(mut self, id: RegionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the polygon vertices.
    pub fn coords(mut self, coords: Vec<Point>) -> Self {
        self.coords = coords;
        self
    }

    /// Set the intended position within the page list.
    pub fn idx(mut self, idx: usize) -> Self {
        self.idx = idx;
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: RegionCategory) -> Self {
        self.category = category;
        self
    }

    /// Attach a base64-encoded thumbnail.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the parent region id.
    pub fn parent(mut self, parent: Option<RegionId>) -> Self {
        self.parent = parent;
        self
    }

    /// Set the description note.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate the polygon and produce the region.
    ///
    /// Fails with [`crate::Error::InvalidGeometry`] when the polygon has
    /// fewer than 3 vertices or covers less than [`MIN_REGION_AREA`].
    pub fn finish(self) -> Result<Region> {
        geometry::validate_polygon(&self.coords, MIN_REGION_AREA)?;
        Ok(Region {
            id: self.id.unwrap_or_else(RegionId::generate),
            doc: self.doc,
            page: self.page,
            idx: self.idx,
            coords: self.coords,
            text: self.text,
            category: self.category,
            image: self.image,
            parent: self.parent,
            children: Vec::new(),
            description: self.description,
        })
    }
}
