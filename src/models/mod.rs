mod identifiers;
pub mod templates;

pub use identifiers::{AssociationId, ContentId, PageId, PlacementId, SectionId};
pub use templates::{SectionTemplate, template_for, templates};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A landing page: an ordered sequence of section placements.
///
/// The page owns its placement order; sections themselves are shared catalog
/// objects referenced by placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub is_active: bool,
    /// Ordered, dense (no position gaps after any mutation).
    pub placements: Vec<SectionPlacement>,
}

impl Page {
    /// Find the placement that references the given section, if any.
    pub fn placement_for_section(&self, section_id: &SectionId) -> Option<&SectionPlacement> {
        self.placements.iter().find(|p| &p.section.id == section_id)
    }

    /// Positions re-derived from the current order. Used after any reorder
    /// so the sequence stays gapless.
    pub fn renumber(&mut self) {
        for (idx, placement) in self.placements.iter_mut().enumerate() {
            placement.position = idx as u32;
        }
    }
}

/// Pairs a section with its position on a specific page. Unique per
/// (page, section) within a page's sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPlacement {
    pub id: PlacementId,
    pub position: u32,
    pub section: Section,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    #[serde(rename = "section_type")]
    pub kind: SectionKind,
    #[serde(rename = "content_selection_type", default)]
    pub selection: SelectionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Carousel,
}

impl SectionKind {
    /// Cardinality rule for the section type: how many content associations
    /// it may hold. Hero is a strict singleton.
    pub fn max_content(&self) -> usize {
        match self {
            SectionKind::Hero => 1,
            SectionKind::Carousel => templates::CAROUSEL_CONTENT_CAP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Carousel => "carousel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Manual,
    Automatic,
}

/// A movie or series record from the catalog. Read-only here: the builder
/// references catalog items but never creates or mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub poster_url: Option<String>,
    pub background_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

/// Links a section to a content item at an ordered position scoped to that
/// section. Does not own the item it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAssociation {
    pub id: AssociationId,
    pub position: u32,
    pub content_type: ContentKind,
    pub content: ContentItem,
}

/// Kind filter for the content listing read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    #[default]
    All,
    Movie,
    Series,
}

impl ContentFilter {
    pub fn matches(&self, kind: ContentKind) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Movie => kind == ContentKind::Movie,
            ContentFilter::Series => kind == ContentKind::Series,
        }
    }
}
