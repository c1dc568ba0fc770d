//! Ingestion of layout-extractor output.
//!
//! External extractors emit a tree of partitions per document, with
//! coordinates in their own pixel space and categories under their own
//! element-type names. The importer maps each partition into a [`Region`]:
//! coordinates are rescaled into page space, categories are translated, and
//! partitions that arrive without coordinates inherit the convex hull of
//! their children's polygons.

use crate::category::RegionCategory;
use crate::geometry::{self, Point};
use crate::region::{Region, RegionId};
use base64::Engine;
use serde::Deserialize;
use std::collections::HashMap;

/// Direction of the Y axis in an extractor's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// Y grows downward from the top edge (typical for raster output)
    Downward,
    /// Y grows upward from the bottom edge (page-native)
    Upward,
}

/// The coordinate space a partition's points are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoordinateSystem {
    /// Width of the space
    pub width: f64,
    /// Height of the space
    pub height: f64,
    /// Y-axis direction
    #[serde(default = "CoordinateSystem::default_y_axis")]
    pub y_axis: YAxis,
}

impl CoordinateSystem {
    fn default_y_axis() -> YAxis {
        YAxis::Downward
    }
}

/// One node of the extractor's partition tree, as deserialized from its
/// JSON output.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPartition {
    /// Extractor-assigned id, if any
    #[serde(default)]
    pub id: Option<String>,
    /// Extractor element-type name
    pub category: String,
    /// Plain-text content
    #[serde(default)]
    pub text: Option<String>,
    /// HTML rendering of a table's content; preferred over `text` for
    /// table partitions
    #[serde(default)]
    pub table_html: Option<String>,
    /// Page number the partition sits on
    pub page: u32,
    /// Polygon vertices in the extractor's space
    #[serde(default)]
    pub points: Option<Vec<Point>>,
    /// The space `points` are expressed in
    #[serde(default)]
    pub system: Option<CoordinateSystem>,
    /// Base64-encoded snapshot of the partition
    #[serde(default)]
    pub image_base64: Option<String>,
    /// Nested partitions
    #[serde(default)]
    pub children: Vec<RawPartition>,
}

/// Rescale a point from an extractor space into page space.
///
/// Scaling is proportional on both axes. A downward Y axis is flipped so
/// the result always has Y growing upward from the page bottom.
pub fn map_point_to_page(p: Point, system: &CoordinateSystem, page_size: (f64, f64)) -> Point {
    let (page_w, page_h) = page_size;
    let x = p.x / system.width * page_w;
    let y = p.y / system.height * page_h;
    match system.y_axis {
        YAxis::Downward => Point::new(x, page_h - y),
        YAxis::Upward => Point::new(x, y),
    }
}

/// Shrinks partition snapshots to a bounded size before they are stored on
/// regions.
pub trait ThumbnailScaler {
    /// Scale `b64` (a base64-encoded image) to fit within `max` pixels.
    fn scale(&self, b64: &str, max: (u32, u32)) -> String;
}

/// Keeps snapshots as-is. Stands in where no image pipeline is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughScaler;

impl ThumbnailScaler for PassthroughScaler {
    fn scale(&self, b64: &str, _max: (u32, u32)) -> String {
        b64.to_string()
    }
}

/// Default thumbnail bound, in pixels.
pub const DEFAULT_MAX_THUMBNAIL: (u32, u32) = (360, 360);

/// Converts an extractor partition tree into flat region records.
pub struct PartitionImporter {
    doc: String,
    page_sizes: HashMap<u32, (f64, f64)>,
    max_thumbnail: (u32, u32),
    scaler: Box<dyn ThumbnailScaler>,
}

impl PartitionImporter {
    /// Create an importer for `doc` given the size of each page in page
    /// space.
    pub fn new(doc: impl Into<String>, page_sizes: HashMap<u32, (f64, f64)>) -> Self {
        Self {
            doc: doc.into(),
            page_sizes,
            max_thumbnail: DEFAULT_MAX_THUMBNAIL,
            scaler: Box::new(PassthroughScaler),
        }
    }

    /// Replace the thumbnail scaler.
    pub fn with_scaler(mut self, scaler: Box<dyn ThumbnailScaler>) -> Self {
        self.scaler = scaler;
        self
    }

    /// Change the thumbnail size bound.
    pub fn with_max_thumbnail(mut self, max: (u32, u32)) -> Self {
        self.max_thumbnail = max;
        self
    }

    /// Convert a partition forest into regions, children before parents.
    ///
    /// Partitions that end up without a usable polygon are dropped with a
    /// warning; their children survive as regions with a dangling parent
    /// pointer removed (they are re-rooted).
    pub fn import(&self, partitions: &[RawPartition]) -> Vec<Region> {
        let mut out = Vec::new();
        for part in partitions {
            self.visit(part, None, &mut out);
        }
        // Positions follow emit order within each page.
        let mut next_idx: HashMap<u32, usize> = HashMap::new();
        for region in &mut out {
            let idx = next_idx.entry(region.page).or_insert(0);
            region.idx = *idx;
            *idx += 1;
        }
        out
    }

    /// Visit one partition; returns the emitted region's id and its polygon
    /// in page space, for the parent's hull inference.
    fn visit(
        &self,
        part: &RawPartition,
        parent: Option<RegionId>,
        out: &mut Vec<Region>,
    ) -> Option<(RegionId, Vec<Point>)> {
        let id = part
            .id
            .as_deref()
            .map(RegionId::from)
            .unwrap_or_else(RegionId::generate);

        // Children first: their polygons feed the parent's hull when the
        // extractor gave the parent no coordinates.
        let mut child_points = Vec::new();
        for child in &part.children {
            if let Some((_, points)) = self.visit(child, Some(id.clone()), out) {
                child_points.extend(points.iter().copied());
            }
        }

        let inferred = || {
            let hull = geometry::convex_hull(child_points.clone());
            (hull.len() >= 3).then_some(hull)
        };
        let coords = match self.own_coords(part).or_else(inferred) {
            Some(coords) => coords,
            None => {
                log::warn!(
                    "dropping partition {:?} on page {}: no usable polygon",
                    part.id,
                    part.page
                );
                // Re-root the children that were emitted under this id.
                for region in out.iter_mut() {
                    if region.parent.as_ref() == Some(&id) {
                        region.parent = parent.clone();
                    }
                }
                return None;
            },
        };

        let category = RegionCategory::from_extractor_name(&part.category);
        let text = match (category, &part.table_html) {
            (RegionCategory::Table, Some(html)) if !html.trim().is_empty() => html.clone(),
            _ => part.text.clone().unwrap_or_default(),
        };
        let image = part
            .image_base64
            .as_deref()
            .and_then(|b64| self.checked_thumbnail(b64, &part.id))
            .unwrap_or_default();

        out.push(Region {
            id: id.clone(),
            doc: self.doc.clone(),
            page: part.page,
            idx: 0,
            coords: coords.clone(),
            text,
            category,
            image,
            parent,
            children: Vec::new(),
            description: String::new(),
        });
        Some((id, coords))
    }

    /// Map the partition's own points into page space, if it has any.
    fn own_coords(&self, part: &RawPartition) -> Option<Vec<Point>> {
        let points = part.points.as_ref()?;
        if points.len() < 3 {
            return None;
        }
        let system = part.system.as_ref()?;
        let Some(&page_size) = self.page_sizes.get(&part.page) else {
            log::warn!("no page size for page {}, cannot map coordinates", part.page);
            return None;
        };
        Some(
            points
                .iter()
                .map(|&p| map_point_to_page(p, system, page_size))
                .collect(),
        )
    }

    /// Validate and scale a snapshot; invalid base64 is dropped.
    fn checked_thumbnail(&self, b64: &str, part_id: &Option<String>) -> Option<String> {
        match base64::engine::general_purpose::STANDARD.decode(b64) {
            Ok(_) => Some(self.scaler.scale(b64, self.max_thumbnail)),
            Err(e) => {
                log::warn!("dropping invalid snapshot on partition {part_id:?}: {e}");
                None
            },
        }
    }
}
