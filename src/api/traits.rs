use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{
    AssociationId, ContentAssociation, ContentId, ContentItem, ContentKind, Page, PageId,
    PlacementId, Section, SectionId, SectionKind, SelectionMode,
};

/// Fields for creating a new section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSection {
    pub name: String,
    #[serde(rename = "section_type")]
    pub kind: SectionKind,
    #[serde(rename = "content_selection_type")]
    pub selection: SelectionMode,
}

/// A catalog item chosen for attachment to a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPick {
    pub content_type: ContentKind,
    pub content_id: ContentId,
}

impl ContentPick {
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            content_type: item.kind,
            content_id: item.id.clone(),
        }
    }
}

/// Remote landing-page API. The server is the source of truth for pages,
/// sections, and their orderings; this core only reads and mutates through
/// these operations.
#[async_trait]
pub trait LandingApi: Send + Sync {
    async fn fetch_landing_pages(&self) -> Result<Vec<Page>>;

    async fn fetch_sections(&self) -> Result<Vec<Section>>;

    async fn fetch_movies(&self) -> Result<Vec<ContentItem>>;

    async fn fetch_series(&self) -> Result<Vec<ContentItem>>;

    /// Ordered content associations of one section.
    async fn fetch_section_content(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<ContentAssociation>>;

    async fn create_section(&self, request: CreateSection) -> Result<Section>;

    async fn update_section_name(&self, section_id: &SectionId, name: &str) -> Result<()>;

    async fn add_section_to_page(&self, page_id: &PageId, section_id: &SectionId) -> Result<()>;

    async fn remove_section_from_page(
        &self,
        page_id: &PageId,
        section_id: &SectionId,
    ) -> Result<()>;

    /// Persist a page's placement order. IDs are placement IDs, in the new
    /// visible order.
    async fn reorder_sections(&self, page_id: &PageId, order: &[PlacementId]) -> Result<()>;

    /// Persist a section's content order. IDs are association IDs, in the
    /// new visible order.
    async fn reorder_section_content(
        &self,
        section_id: &SectionId,
        order: &[AssociationId],
    ) -> Result<()>;

    async fn add_content_to_section(
        &self,
        section_id: &SectionId,
        pick: &ContentPick,
    ) -> Result<ContentAssociation>;

    async fn remove_content_from_section(
        &self,
        section_id: &SectionId,
        association_id: &AssociationId,
    ) -> Result<()>;

    /// Persist the whole page object (the toolbar Save action).
    async fn update_landing_page(&self, page: &Page) -> Result<()>;
}
