use serde::{Deserialize, Serialize};

use crate::error::BuilderError;
use crate::models::{ContentItem, PlacementId, SectionTemplate};

/// What a drag session carries. Payloads cross the host's drag-and-drop
/// transport as tagged JSON, so a corrupt string is always possible and
/// parsing is fallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    /// A section template dragged from the element palette onto the page.
    Template { template: SectionTemplate },

    /// A catalog item dragged from the content browser into a section.
    Content { item: ContentItem },

    /// An existing placement dragged to a new position on its page.
    Placement { placement_id: PlacementId },
}

impl DragPayload {
    pub fn from_json(raw: &str) -> Result<Self, BuilderError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, BuilderError> {
        Ok(serde_json::to_string(self)?)
    }
}
