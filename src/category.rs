//! Region categories and their attached display metadata.
//!
//! Categories form a closed enumeration. Each variant carries a static
//! [`CategoryInfo`] entry with the display name used in persisted JSON, the
//! overlay color, the keyboard shortcut, and the element-type names used by
//! the external layout extractor. Reverse lookups by display name and by
//! extractor name are built once at startup.

use lazy_static::lazy_static;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The category assigned to an annotated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionCategory {
    /// Figure or table caption
    Caption,
    /// Narrative body text
    Text,
    /// List item
    ListItem,
    /// Title or heading
    Title,
    /// Address or contact block
    Contact,
    /// Table
    Table,
    /// Image or figure
    Image,
    /// Page header
    Header,
    /// Page footer
    Footer,
    /// Mathematical formula
    Formula,
    /// Composite container grouping other regions
    Container,
    /// Unrecognized content
    Unknown,
}

/// Display metadata attached to a [`RegionCategory`].
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    /// Display name, also the serialized form in project JSON
    pub name: &'static str,
    /// Overlay color in hex notation
    pub color: &'static str,
    /// Keyboard shortcut for assigning this category
    pub shortcut: char,
    /// Element-type names the layout extractor uses for this category
    pub extractor_names: &'static [&'static str],
}

/// Static metadata table, one row per category in `ALL` order.
static CATEGORY_TABLE: [(RegionCategory, CategoryInfo); 12] = [
    (
        RegionCategory::Caption,
        CategoryInfo {
            name: "caption",
            color: "#1f77b4",
            shortcut: 'C',
            extractor_names: &["FigureCaption"],
        },
    ),
    (
        RegionCategory::Text,
        CategoryInfo {
            name: "text",
            color: "#2ca02c",
            shortcut: 'T',
            extractor_names: &["NarrativeText"],
        },
    ),
    (
        RegionCategory::ListItem,
        CategoryInfo {
            name: "listItem",
            color: "#ff7f0e",
            shortcut: 'L',
            extractor_names: &["ListItem"],
        },
    ),
    (
        RegionCategory::Title,
        CategoryInfo {
            name: "title",
            color: "#9467bd",
            shortcut: 'I',
            extractor_names: &["Title"],
        },
    ),
    (
        RegionCategory::Contact,
        CategoryInfo {
            name: "contact",
            color: "#8c564b",
            shortcut: 'O',
            extractor_names: &["Address"],
        },
    ),
    (
        RegionCategory::Table,
        CategoryInfo {
            name: "table",
            color: "#e377c2",
            shortcut: 'B',
            extractor_names: &["Table"],
        },
    ),
    (
        RegionCategory::Image,
        CategoryInfo {
            name: "image",
            color: "#17becf",
            shortcut: 'M',
            extractor_names: &["Image"],
        },
    ),
    (
        RegionCategory::Header,
        CategoryInfo {
            name: "header",
            color: "#ffbb78",
            shortcut: 'H',
            extractor_names: &["Header"],
        },
    ),
    (
        RegionCategory::Footer,
        CategoryInfo {
            name: "footer",
            color: "#bcbd22",
            shortcut: 'F',
            extractor_names: &["Footer"],
        },
    ),
    (
        RegionCategory::Formula,
        CategoryInfo {
            name: "formula",
            color: "#550A21",
            shortcut: 'R',
            extractor_names: &["Formula"],
        },
    ),
    (
        RegionCategory::Container,
        CategoryInfo {
            name: "container",
            color: "#aec7e8",
            shortcut: 'N',
            extractor_names: &["CompositeElement"],
        },
    ),
    (
        RegionCategory::Unknown,
        CategoryInfo {
            name: "unknown",
            color: "#7f7f7f",
            shortcut: 'U',
            extractor_names: &["PageBreak", "UncategorizedText"],
        },
    ),
];

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, RegionCategory> = {
        let mut m = HashMap::new();
        for (cat, info) in &CATEGORY_TABLE {
            m.insert(info.name, *cat);
        }
        m
    };
    static ref BY_EXTRACTOR_NAME: HashMap<&'static str, RegionCategory> = {
        let mut m = HashMap::new();
        for (cat, info) in &CATEGORY_TABLE {
            for name in info.extractor_names {
                m.insert(*name, *cat);
            }
        }
        m
    };
}

impl RegionCategory {
    /// All categories in display order.
    pub const ALL: [RegionCategory; 12] = [
        RegionCategory::Caption,
        RegionCategory::Text,
        RegionCategory::ListItem,
        RegionCategory::Title,
        RegionCategory::Contact,
        RegionCategory::Table,
        RegionCategory::Image,
        RegionCategory::Header,
        RegionCategory::Footer,
        RegionCategory::Formula,
        RegionCategory::Container,
        RegionCategory::Unknown,
    ];

    /// Metadata for this category.
    pub fn info(&self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[*self as usize].1
    }

    /// Display name (the serialized form).
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Overlay color in hex notation.
    pub fn color(&self) -> &'static str {
        self.info().color
    }

    /// Map a display name to a category.
    ///
    /// Unrecognized names fall back to [`RegionCategory::Unknown`] with a
    /// warning, so stale project files still load.
    pub fn from_name(name: &str) -> Self {
        match BY_NAME.get(name) {
            Some(cat) => *cat,
            None => {
                log::warn!("unknown region category name: {name:?}");
                RegionCategory::Unknown
            },
        }
    }

    /// Map a layout-extractor element-type name to a category.
    ///
    /// Unrecognized names fall back to [`RegionCategory::Unknown`] with a
    /// warning.
    pub fn from_extractor_name(name: &str) -> Self {
        match BY_EXTRACTOR_NAME.get(name) {
            Some(cat) => *cat,
            None => {
                log::warn!("unknown extractor element type: {name:?}");
                RegionCategory::Unknown
            },
        }
    }
}

impl std::fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for RegionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for RegionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(RegionCategory::from_name(&name))
    }
}
