use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::sync::{
    Invalidation, MutationOutcome, OrderedStore, ReorderOutcome, SyncController, run_invalidations,
};
use crate::api::{CreateSection, LandingApi};
use crate::cache::{self, CacheKey, QueryCache};
use crate::config::Config;
use crate::drag::DragPayload;
use crate::events::{BuilderEvent, EventBus, EventPayload, EventType};
use crate::models::{Page, SectionId, SectionPlacement, SelectionMode};

/// Adapter exposing the selected page's placement sequence to the sync
/// controller. Storing renumbers so the order stays dense.
struct PlacementStore<'a> {
    page: &'a RwLock<Option<Page>>,
}

#[async_trait]
impl OrderedStore<SectionPlacement> for PlacementStore<'_> {
    async fn load(&self) -> Option<Vec<SectionPlacement>> {
        self.page
            .read()
            .await
            .as_ref()
            .map(|p| p.placements.clone())
    }

    async fn store(&self, items: Vec<SectionPlacement>) {
        if let Some(page) = self.page.write().await.as_mut() {
            page.placements = items;
            page.renumber();
        }
    }
}

/// Page-level operations: loading and selecting landing pages, placing
/// sections on them, reordering and removing placements.
pub struct PageService {
    api: Arc<dyn LandingApi>,
    cache: Arc<dyn QueryCache>,
    events: Arc<EventBus>,
    config: Arc<RwLock<Config>>,
    sync: SyncController,
}

impl PageService {
    pub fn new(
        api: Arc<dyn LandingApi>,
        cache: Arc<dyn QueryCache>,
        events: Arc<EventBus>,
        config: Arc<RwLock<Config>>,
    ) -> Self {
        let sync = SyncController::new(cache.clone(), events.clone());
        Self {
            api,
            cache,
            events,
            config,
            sync,
        }
    }

    /// Landing pages, cache-aside under `landing-pages`.
    pub async fn load_pages(&self) -> Result<Vec<Page>> {
        if let Some(cached) = cache::get_typed(self.cache.as_ref(), &CacheKey::LandingPages).await {
            return Ok(cached);
        }
        self.refresh_pages().await
    }

    /// Fetch pages from the server and replace the cached listing.
    pub async fn refresh_pages(&self) -> Result<Vec<Page>> {
        let pages = self
            .api
            .fetch_landing_pages()
            .await
            .context("Failed to fetch landing pages")?;
        cache::put_typed(self.cache.as_ref(), CacheKey::LandingPages, &pages).await?;
        Ok(pages)
    }

    /// Remember the selection so the next session can restore it.
    pub async fn select_page(&self, page: &Page) {
        self.config.write().await.workspace.last_selected_page = Some(page.id.to_string());
        self.events.publish(BuilderEvent::new(
            EventType::PageSelected,
            EventPayload::Page {
                id: page.id.clone(),
            },
        ));
    }

    /// The previously selected page, if it still exists among the fetched
    /// pages. A stale stored ID is ignored.
    pub async fn restore_selection(&self, pages: &[Page]) -> Option<Page> {
        let stored = self.config.read().await.workspace.last_selected_page.clone()?;
        pages.iter().find(|p| p.id.as_str() == stored).cloned()
    }

    /// Sidebar drop: parse the dragged template, create the section, attach
    /// it to the page, then refresh so the visible page carries the new
    /// placement. Create and attach run strictly in sequence.
    pub async fn drop_template(
        &self,
        visible: &RwLock<Option<Page>>,
        raw_payload: &str,
    ) -> MutationOutcome {
        let Some(page_id) = visible.read().await.as_ref().map(|p| p.id.clone()) else {
            self.publish_message(EventType::DropDiscarded, "No landing page selected");
            return MutationOutcome::Skipped;
        };

        let template = match DragPayload::from_json(raw_payload) {
            Ok(DragPayload::Template { template }) => template,
            Ok(_) => {
                self.publish_message(EventType::DropDiscarded, "Dropped payload is not a template");
                return MutationOutcome::Skipped;
            }
            Err(e) => {
                warn!("Discarding malformed drag payload: {:#}", e);
                self.publish_message(EventType::DropDiscarded, &e.to_string());
                return MutationOutcome::Skipped;
            }
        };

        let section = match self
            .api
            .create_section(CreateSection {
                name: template.name.clone(),
                kind: template.kind,
                selection: SelectionMode::Manual,
            })
            .await
        {
            Ok(section) => {
                self.cache.invalidate(&CacheKey::Sections).await;
                self.events.publish(BuilderEvent::new(
                    EventType::SectionCreated,
                    EventPayload::Section {
                        id: section.id.clone(),
                        page_id: None,
                    },
                ));
                section
            }
            Err(e) => {
                warn!("Section create failed: {:#}", e);
                self.publish_message(EventType::SectionCreateFailed, &e.to_string());
                return MutationOutcome::Failed;
            }
        };

        if let Err(e) = self.api.add_section_to_page(&page_id, &section.id).await {
            warn!("Section attach failed: {:#}", e);
            self.publish_message(EventType::SectionAttachFailed, &e.to_string());
            return MutationOutcome::Failed;
        }
        self.cache.invalidate(&CacheKey::LandingPages).await;

        // Refresh so the visible page picks up the server-assigned placement.
        match self.refresh_pages().await {
            Ok(pages) => {
                if let Some(updated) = pages.into_iter().find(|p| p.id == page_id) {
                    *visible.write().await = Some(updated);
                }
            }
            Err(e) => warn!("Page refresh after attach failed: {:#}", e),
        }

        info!("Section {} attached to page {}", section.id, page_id);
        self.events.publish(BuilderEvent::new(
            EventType::SectionAttached,
            EventPayload::Section {
                id: section.id,
                page_id: Some(page_id),
            },
        ));
        MutationOutcome::Applied
    }

    /// Remove a section's placement from the visible page optimistically:
    /// the placement disappears immediately and reappears (exact snapshot)
    /// if the server refuses.
    pub async fn remove_section(
        &self,
        visible: &RwLock<Option<Page>>,
        section_id: &SectionId,
    ) -> MutationOutcome {
        let snapshot = {
            let mut guard = visible.write().await;
            let Some(page) = guard.as_mut() else {
                return MutationOutcome::Skipped;
            };
            let snapshot = page.clone();
            page.placements.retain(|p| &p.section.id != section_id);
            page.renumber();
            snapshot
        };

        match self
            .api
            .remove_section_from_page(&snapshot.id, section_id)
            .await
        {
            Ok(()) => {
                run_invalidations(
                    self.cache.as_ref(),
                    &[
                        Invalidation::Key(CacheKey::LandingPages),
                        Invalidation::Key(CacheKey::PageData(snapshot.id.clone())),
                    ],
                )
                .await;
                info!("Section {} removed from page {}", section_id, snapshot.id);
                self.events.publish(BuilderEvent::new(
                    EventType::SectionDetached,
                    EventPayload::Section {
                        id: section_id.clone(),
                        page_id: Some(snapshot.id),
                    },
                ));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Section remove failed, restoring page: {:#}", e);
                *visible.write().await = Some(snapshot);
                self.publish_message(EventType::SectionDetachFailed, &e.to_string());
                MutationOutcome::Failed
            }
        }
    }

    /// Drag-reorder of the visible page's placements, optimistic with
    /// rollback.
    pub async fn reorder_sections(
        &self,
        visible: &RwLock<Option<Page>>,
        source: usize,
        dest: usize,
    ) -> ReorderOutcome {
        let Some(page_id) = visible.read().await.as_ref().map(|p| p.id.clone()) else {
            return ReorderOutcome::NoOp;
        };

        let store = PlacementStore { page: visible };
        let invalidations = vec![
            Invalidation::Key(CacheKey::LandingPages),
            Invalidation::Key(CacheKey::PageData(page_id.clone())),
        ];
        self.sync
            .apply_reorder(
                &store,
                source,
                dest,
                |placement| placement.id.clone(),
                |ids| async move { self.api.reorder_sections(&page_id, &ids).await },
                &invalidations,
                EventType::SectionOrderSaved,
                EventType::SectionOrderRejected,
            )
            .await
    }

    pub async fn rename_section(&self, section_id: &SectionId, name: &str) -> MutationOutcome {
        match self.api.update_section_name(section_id, name).await {
            Ok(()) => {
                self.cache.invalidate(&CacheKey::Sections).await;
                self.events.publish(BuilderEvent::new(
                    EventType::SectionRenamed,
                    EventPayload::Section {
                        id: section_id.clone(),
                        page_id: None,
                    },
                ));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Section rename failed: {:#}", e);
                self.publish_message(EventType::SectionRenameFailed, &e.to_string());
                MutationOutcome::Failed
            }
        }
    }

    /// Toolbar save: persist the whole visible page object.
    pub async fn save_page(&self, page: &Page) -> MutationOutcome {
        match self.api.update_landing_page(page).await {
            Ok(()) => {
                run_invalidations(
                    self.cache.as_ref(),
                    &[
                        Invalidation::Key(CacheKey::LandingPages),
                        Invalidation::Key(CacheKey::PageData(page.id.clone())),
                    ],
                )
                .await;
                self.events.publish(BuilderEvent::new(
                    EventType::PageSaved,
                    EventPayload::Page {
                        id: page.id.clone(),
                    },
                ));
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!("Page save failed: {:#}", e);
                self.publish_message(EventType::PageSaveFailed, &e.to_string());
                MutationOutcome::Failed
            }
        }
    }

    fn publish_message(&self, event_type: EventType, text: &str) {
        self.events.publish(BuilderEvent::new(
            event_type,
            EventPayload::Message {
                text: text.to_string(),
            },
        ));
    }
}
