use anyhow::{Context, Result};
use futures::future::try_join;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::sync::{
    Invalidation, MutationOutcome, OrderedStore, ReorderOutcome, SyncController, run_invalidations,
};
use crate::api::{ContentPick, LandingApi};
use crate::cache::{self, CacheKey, KeyClass, QueryCache};
use crate::events::{BuilderEvent, EventBus, EventPayload, EventType};
use crate::models::{
    AssociationId, ContentAssociation, ContentFilter, ContentItem, Section, SectionId, SectionKind,
};

/// Direction for the row move buttons. Same reorder engine as dragging, with
/// the destination one step away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Manages the add/remove relationship between a section and its content,
/// enforcing per-section-type cardinality (a hero holds exactly one item).
pub struct ContentService {
    api: Arc<dyn LandingApi>,
    cache: Arc<dyn QueryCache>,
    events: Arc<EventBus>,
    sync: SyncController,
}

impl ContentService {
    pub fn new(
        api: Arc<dyn LandingApi>,
        cache: Arc<dyn QueryCache>,
        events: Arc<EventBus>,
    ) -> Self {
        let sync = SyncController::new(cache.clone(), events.clone());
        Self {
            api,
            cache,
            events,
            sync,
        }
    }

    /// Everything a content mutation can go stale: the section catalog, the
    /// section's own listing, and every composed page-data view (the page a
    /// section sits on is not known here).
    fn invalidations(section_id: &SectionId) -> Vec<Invalidation> {
        vec![
            Invalidation::Key(CacheKey::Sections),
            Invalidation::Key(CacheKey::SectionContent(section_id.clone())),
            Invalidation::Class(KeyClass::PageData),
        ]
    }

    /// Ordered content listing for a section, cache-aside.
    pub async fn section_content(&self, section_id: &SectionId) -> Result<Vec<ContentAssociation>> {
        let key = CacheKey::SectionContent(section_id.clone());
        if let Some(cached) = cache::get_typed(self.cache.as_ref(), &key).await {
            return Ok(cached);
        }

        let listing = self
            .api
            .fetch_section_content(section_id)
            .await
            .with_context(|| format!("Failed to fetch content for section {}", section_id))?;
        cache::put_typed(self.cache.as_ref(), key, &listing).await?;
        Ok(listing)
    }

    /// The full catalog: movies and series, fetched together.
    pub async fn catalog(&self) -> Result<Vec<ContentItem>> {
        let (movies, series) = try_join(self.api.fetch_movies(), self.api.fetch_series())
            .await
            .context("Failed to fetch catalog")?;
        Ok(movies.into_iter().chain(series).collect())
    }

    /// Attach a catalog item to a section.
    ///
    /// For a hero section that already holds an item, the existing
    /// association is removed first and the add only proceeds once the
    /// remove has completed: both calls target the same section, and running
    /// them concurrently could persist zero or two associations.
    pub async fn add_content(&self, section: &Section, pick: ContentPick) -> MutationOutcome {
        if section.kind == SectionKind::Hero {
            let existing = match self.section_content(&section.id).await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("Cannot check hero occupancy: {:#}", e);
                    self.publish_failure(EventType::ContentAddFailed, &e);
                    return MutationOutcome::Failed;
                }
            };

            if let Some(current) = existing.first() {
                info!(
                    "Hero section {} occupied by {}, removing before add",
                    section.id, current.id
                );
                if let Err(e) = self
                    .api
                    .remove_content_from_section(&section.id, &current.id)
                    .await
                {
                    // No add is attempted: the old association stays put.
                    warn!("Hero swap remove step failed: {:#}", e);
                    self.publish_failure(EventType::ContentAddFailed, &e);
                    return MutationOutcome::Failed;
                }
            }
        }

        match self.api.add_content_to_section(&section.id, &pick).await {
            Ok(association) => {
                run_invalidations(self.cache.as_ref(), &Self::invalidations(&section.id)).await;
                info!("Added {} to section {}", pick.content_id, section.id);
                self.events.publish(BuilderEvent::new(
                    EventType::ContentAdded,
                    EventPayload::Content {
                        section_id: section.id.clone(),
                        association_id: Some(association.id),
                        content_id: Some(pick.content_id),
                    },
                ));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Add content failed: {:#}", e);
                self.publish_failure(EventType::ContentAddFailed, &e);
                MutationOutcome::Failed
            }
        }
    }

    /// Detach an association from its section. The remote store is the
    /// source of truth; the listing refreshes through invalidation rather
    /// than an optimistic local removal.
    pub async fn remove_content(
        &self,
        section_id: &SectionId,
        association_id: &AssociationId,
    ) -> MutationOutcome {
        match self
            .api
            .remove_content_from_section(section_id, association_id)
            .await
        {
            Ok(()) => {
                run_invalidations(self.cache.as_ref(), &Self::invalidations(section_id)).await;
                info!("Removed {} from section {}", association_id, section_id);
                self.events.publish(BuilderEvent::new(
                    EventType::ContentRemoved,
                    EventPayload::Content {
                        section_id: section_id.clone(),
                        association_id: Some(association_id.clone()),
                        content_id: None,
                    },
                ));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Remove content failed: {:#}", e);
                self.publish_failure(EventType::ContentRemoveFailed, &e);
                MutationOutcome::Failed
            }
        }
    }

    /// Drag-reorder of a section's content listing, optimistic with
    /// rollback.
    pub async fn reorder_content(
        &self,
        section_id: &SectionId,
        visible: &RwLock<Vec<ContentAssociation>>,
        source: usize,
        dest: usize,
    ) -> ReorderOutcome {
        let invalidations = vec![
            Invalidation::Key(CacheKey::SectionContent(section_id.clone())),
            Invalidation::Class(KeyClass::PageData),
        ];
        self.sync
            .apply_reorder(
                visible as &dyn OrderedStore<ContentAssociation>,
                source,
                dest,
                |assoc| assoc.id.clone(),
                |ids| async move { self.api.reorder_section_content(section_id, &ids).await },
                &invalidations,
                EventType::ContentOrderSaved,
                EventType::ContentOrderRejected,
            )
            .await
    }

    /// The up/down row buttons are the same reorder operation with the
    /// destination one step away; edge rows fall into the no-op guard and
    /// issue no network call.
    pub async fn move_content(
        &self,
        section_id: &SectionId,
        visible: &RwLock<Vec<ContentAssociation>>,
        index: usize,
        direction: MoveDirection,
    ) -> ReorderOutcome {
        let dest = match direction {
            MoveDirection::Up => index.wrapping_sub(1),
            MoveDirection::Down => index + 1,
        };
        self.reorder_content(section_id, visible, index, dest).await
    }

    fn publish_failure(&self, event_type: EventType, error: &anyhow::Error) {
        self.events.publish(BuilderEvent::new(
            event_type,
            EventPayload::Message {
                text: error.to_string(),
            },
        ));
    }
}

/// Content listing filter: the term must be a case-insensitive substring of
/// the title or the description, AND the kind filter must match. An empty
/// term matches everything.
pub fn filter_content<'a>(
    items: &'a [ContentItem],
    term: &str,
    filter: ContentFilter,
) -> Vec<&'a ContentItem> {
    let term = term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let matches_term = item.title.to_lowercase().contains(&term)
                || item.description.to_lowercase().contains(&term);
            matches_term && filter.matches(item.kind)
        })
        .collect()
}
