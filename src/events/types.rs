use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AssociationId, ContentId, PageId, SectionId};

/// Outcome event for a builder mutation. Every mutation publishes exactly one
/// of these; hosts subscribe and render them as toasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl BuilderEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.event_type.severity()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    // Section order
    SectionOrderSaved,
    SectionOrderRejected,

    // Content order
    ContentOrderSaved,
    ContentOrderRejected,

    // Content association
    ContentAdded,
    ContentAddFailed,
    ContentRemoved,
    ContentRemoveFailed,

    // Section lifecycle on a page
    SectionCreated,
    SectionCreateFailed,
    SectionAttached,
    SectionAttachFailed,
    SectionDetached,
    SectionDetachFailed,
    SectionRenamed,
    SectionRenameFailed,

    // Page
    PageSaved,
    PageSaveFailed,
    PageSelected,

    // Drag session
    DropDiscarded,
}

impl EventType {
    pub fn severity(&self) -> Severity {
        match self {
            EventType::SectionOrderSaved
            | EventType::ContentOrderSaved
            | EventType::ContentAdded
            | EventType::ContentRemoved
            | EventType::SectionCreated
            | EventType::SectionAttached
            | EventType::SectionDetached
            | EventType::SectionRenamed
            | EventType::PageSaved => Severity::Success,

            EventType::SectionOrderRejected
            | EventType::ContentOrderRejected
            | EventType::ContentAddFailed
            | EventType::ContentRemoveFailed
            | EventType::SectionCreateFailed
            | EventType::SectionAttachFailed
            | EventType::SectionDetachFailed
            | EventType::SectionRenameFailed
            | EventType::PageSaveFailed
            | EventType::DropDiscarded => Severity::Failure,

            EventType::PageSelected => Severity::Info,
        }
    }

    /// String representation for filtering/routing.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SectionOrderSaved => "section_order.saved",
            EventType::SectionOrderRejected => "section_order.rejected",
            EventType::ContentOrderSaved => "content_order.saved",
            EventType::ContentOrderRejected => "content_order.rejected",
            EventType::ContentAdded => "content.added",
            EventType::ContentAddFailed => "content.add_failed",
            EventType::ContentRemoved => "content.removed",
            EventType::ContentRemoveFailed => "content.remove_failed",
            EventType::SectionCreated => "section.created",
            EventType::SectionCreateFailed => "section.create_failed",
            EventType::SectionAttached => "section.attached",
            EventType::SectionAttachFailed => "section.attach_failed",
            EventType::SectionDetached => "section.detached",
            EventType::SectionDetachFailed => "section.detach_failed",
            EventType::SectionRenamed => "section.renamed",
            EventType::SectionRenameFailed => "section.rename_failed",
            EventType::PageSaved => "page.saved",
            EventType::PageSaveFailed => "page.save_failed",
            EventType::PageSelected => "page.selected",
            EventType::DropDiscarded => "drag.drop_discarded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Page {
        id: PageId,
    },
    Section {
        id: SectionId,
        page_id: Option<PageId>,
    },
    Content {
        section_id: SectionId,
        association_id: Option<AssociationId>,
        content_id: Option<ContentId>,
    },
    Order {
        ids: Vec<String>,
    },
    Message {
        text: String,
    },
}
