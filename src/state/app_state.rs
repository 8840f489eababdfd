use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::{LandingApi, RestApi};
use crate::cache::{MemoryCache, QueryCache};
use crate::config::Config;
use crate::drag::DragSession;
use crate::events::EventBus;
use crate::models::{ContentAssociation, Page, SectionId};
use crate::services::{ContentService, PageService};

/// Preview frame width presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    /// Frame width in CSS pixels; Desktop means the full canvas.
    pub fn width_px(&self) -> Option<u32> {
        match self {
            Viewport::Desktop => None,
            Viewport::Tablet => Some(768),
            Viewport::Mobile => Some(375),
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewport::Desktop => write!(f, "desktop"),
            Viewport::Tablet => write!(f, "tablet"),
            Viewport::Mobile => write!(f, "mobile"),
        }
    }
}

/// Shared state of a builder session: the service handles plus everything
/// the canvas renders from.
pub struct BuilderState {
    pub api: Arc<dyn LandingApi>,
    pub cache: Arc<dyn QueryCache>,
    pub event_bus: Arc<EventBus>,
    pub config: Arc<RwLock<Config>>,
    pub pages: Arc<PageService>,
    pub content: Arc<ContentService>,

    /// All landing pages known to the picker.
    pub page_list: Arc<RwLock<Vec<Page>>>,
    /// The page on the canvas. Optimistic mutations edit this in place.
    pub selected_page: Arc<RwLock<Option<Page>>>,
    /// Section whose content listing is open in the inspector.
    pub selected_section: Arc<RwLock<Option<SectionId>>>,
    /// Content listing of the selected section, in display order.
    pub section_listing: Arc<RwLock<Vec<ContentAssociation>>>,
    pub drag: Arc<RwLock<DragSession>>,
    pub viewport: Arc<RwLock<Viewport>>,
    pub preview_mode: Arc<RwLock<bool>>,
}

impl BuilderState {
    pub async fn new(config: Config) -> Result<Self> {
        let api = Arc::new(RestApi::new(&config.server.base_url)?);
        Ok(Self::with_api(api, config))
    }

    /// Assemble around an existing API handle (tests swap in a mock here).
    pub fn with_api(api: Arc<dyn LandingApi>, config: Config) -> Self {
        let cache: Arc<dyn QueryCache> = Arc::new(MemoryCache::new());
        let event_bus = Arc::new(EventBus::default());
        let config = Arc::new(RwLock::new(config));

        let pages = Arc::new(PageService::new(
            api.clone(),
            cache.clone(),
            event_bus.clone(),
            config.clone(),
        ));
        let content = Arc::new(ContentService::new(
            api.clone(),
            cache.clone(),
            event_bus.clone(),
        ));

        Self {
            api,
            cache,
            event_bus,
            config,
            pages,
            content,
            page_list: Arc::new(RwLock::new(Vec::new())),
            selected_page: Arc::new(RwLock::new(None)),
            selected_section: Arc::new(RwLock::new(None)),
            section_listing: Arc::new(RwLock::new(Vec::new())),
            drag: Arc::new(RwLock::new(DragSession::default())),
            viewport: Arc::new(RwLock::new(Viewport::default())),
            preview_mode: Arc::new(RwLock::new(false)),
        }
    }

    /// Put a page on the canvas and remember the choice.
    pub async fn select_page(&self, page: Page) {
        info!("Selecting page {} ({})", page.name, page.id);
        self.pages.select_page(&page).await;
        *self.selected_page.write().await = Some(page);
        *self.selected_section.write().await = None;
        self.section_listing.write().await.clear();
    }

    /// Open a section in the inspector and load its listing.
    pub async fn select_section(&self, section_id: SectionId) -> Result<()> {
        let listing = self.content.section_content(&section_id).await?;
        *self.selected_section.write().await = Some(section_id);
        *self.section_listing.write().await = listing;
        Ok(())
    }

    /// Startup sequence: load pages and restore the previous selection if
    /// that page still exists.
    pub async fn initialize(&self) -> Result<Vec<Page>> {
        let pages = self.pages.load_pages().await?;
        *self.page_list.write().await = pages.clone();
        if let Some(restored) = self.pages.restore_selection(&pages).await {
            *self.selected_page.write().await = Some(restored);
        }
        Ok(pages)
    }
}
