use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::reorder::{compute_reorder, is_noop_reorder};
use crate::cache::{CacheKey, KeyClass, QueryCache};
use crate::events::{BuilderEvent, EventBus, EventPayload, EventType};

/// How a reorder attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Guarded out before any state change or network call.
    NoOp,
    /// Optimistic order persisted and caches invalidated.
    Committed,
    /// Persist failed; the visible state was restored from the snapshot.
    RolledBack,
}

/// How a non-reorder mutation resolved. Failures surface as events, never
/// as errors out of a controller entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Failed,
    /// Guarded out before any network call (nothing selected, payload not
    /// applicable here).
    Skipped,
}

/// Cache entries to drop when a mutation commits.
#[derive(Debug, Clone)]
pub enum Invalidation {
    Key(CacheKey),
    Class(KeyClass),
}

pub async fn run_invalidations(cache: &dyn QueryCache, invalidations: &[Invalidation]) {
    for invalidation in invalidations {
        match invalidation {
            Invalidation::Key(key) => cache.invalidate(key).await,
            Invalidation::Class(class) => cache.invalidate_class(*class).await,
        }
    }
}

/// An ordered collection the sync controller can snapshot and replace.
///
/// `store` must swap the whole sequence in one step so no reader observes a
/// half-updated order.
#[async_trait]
pub trait OrderedStore<T>: Send + Sync {
    /// Current sequence, or None when there is nothing to reorder (no page
    /// selected, listing not loaded yet).
    async fn load(&self) -> Option<Vec<T>>;

    async fn store(&self, items: Vec<T>);
}

#[async_trait]
impl<T: Clone + Send + Sync> OrderedStore<T> for RwLock<Vec<T>> {
    async fn load(&self) -> Option<Vec<T>> {
        Some(self.read().await.clone())
    }

    async fn store(&self, items: Vec<T>) {
        *self.write().await = items;
    }
}

/// Optimistic reorder protocol: snapshot, apply locally, persist, then
/// commit (invalidate derived caches) or revert to the snapshot.
///
/// One network mutation per drop, none for a guarded no-op, no automatic
/// retry; re-dragging is the retry path.
pub struct SyncController {
    cache: Arc<dyn QueryCache>,
    events: Arc<EventBus>,
}

impl SyncController {
    pub fn new(cache: Arc<dyn QueryCache>, events: Arc<EventBus>) -> Self {
        Self { cache, events }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn apply_reorder<T, Id, F, Fut>(
        &self,
        visible: &dyn OrderedStore<T>,
        source: usize,
        dest: usize,
        id_of: impl Fn(&T) -> Id,
        persist: F,
        invalidations: &[Invalidation],
        on_success: EventType,
        on_failure: EventType,
    ) -> ReorderOutcome
    where
        T: Clone + Send + Sync,
        Id: AsRef<str>,
        F: FnOnce(Vec<Id>) -> Fut,
        Fut: Future<Output = Result<()>> + Send,
    {
        let Some(snapshot) = visible.load().await else {
            return ReorderOutcome::NoOp;
        };

        if is_noop_reorder(snapshot.len(), source, dest) {
            debug!("Reorder {} -> {} is a no-op, skipping persist", source, dest);
            return ReorderOutcome::NoOp;
        }

        let new_order = compute_reorder(&snapshot, source, dest);
        let ids: Vec<Id> = new_order.iter().map(&id_of).collect();
        let id_strings: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();

        // Visible state reflects the new order before the round-trip begins.
        visible.store(new_order).await;

        match persist(ids).await {
            Ok(()) => {
                run_invalidations(self.cache.as_ref(), invalidations).await;
                info!("Reorder {} -> {} persisted", source, dest);
                self.events.publish(BuilderEvent::new(
                    on_success,
                    EventPayload::Order { ids: id_strings },
                ));
                ReorderOutcome::Committed
            }
            Err(e) => {
                warn!("Reorder persist failed, rolling back: {:#}", e);
                // Restore the exact pre-drag snapshot, not whatever the
                // current state happens to be.
                visible.store(snapshot).await;
                self.events.publish(BuilderEvent::new(
                    on_failure,
                    EventPayload::Message {
                        text: e.to_string(),
                    },
                ));
                ReorderOutcome::RolledBack
            }
        }
    }
}
