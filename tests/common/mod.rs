pub mod mocks;

use std::sync::Arc;
use tokio::sync::RwLock;

use marquee::cache::{MemoryCache, QueryCache};
use marquee::config::Config;
use marquee::events::{EventBus, EventSubscriber};
use marquee::services::{ContentService, PageService};

use self::mocks::MockApi;

/// Wires the controllers to a mock API over a fresh cache and event bus.
pub struct TestHarness {
    pub api: Arc<MockApi>,
    pub cache: Arc<MemoryCache>,
    pub events: Arc<EventBus>,
    pub config: Arc<RwLock<Config>>,
    pub pages: PageService,
    pub content: ContentService,
}

impl TestHarness {
    pub fn new(api: MockApi) -> Self {
        let api = Arc::new(api);
        let cache = Arc::new(MemoryCache::new());
        let events = Arc::new(EventBus::default());
        let config = Arc::new(RwLock::new(Config::default()));

        let cache_dyn: Arc<dyn QueryCache> = cache.clone();
        let pages = PageService::new(
            api.clone(),
            cache_dyn.clone(),
            events.clone(),
            config.clone(),
        );
        let content = ContentService::new(api.clone(), cache_dyn, events.clone());

        Self {
            api,
            cache,
            events,
            config,
            pages,
            content,
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        self.events.subscribe()
    }
}
