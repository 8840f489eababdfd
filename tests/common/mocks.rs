use anyhow::{Result, anyhow};
use async_trait::async_trait;
use marquee::api::{ContentPick, CreateSection, LandingApi};
use marquee::models::*;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory stand-in for the landing-page backend. Every call is recorded
/// as `name:args` so tests can assert call counts and ordering; failures
/// are injected globally or per method name.
pub struct MockApi {
    pub pages: Mutex<Vec<Page>>,
    pub sections: Mutex<Vec<Section>>,
    pub movies: Vec<ContentItem>,
    pub series: Vec<ContentItem>,
    pub section_content: Mutex<HashMap<String, Vec<ContentAssociation>>>,
    pub calls: Mutex<Vec<String>>,
    error_mode: Mutex<Option<String>>,
    failing_methods: Mutex<HashSet<String>>,
    next_id: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            sections: Mutex::new(Vec::new()),
            movies: Vec::new(),
            series: Vec::new(),
            section_content: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            error_mode: Mutex::new(None),
            failing_methods: Mutex::new(HashSet::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn with_pages(self, pages: Vec<Page>) -> Self {
        *self.pages.lock().unwrap() = pages;
        self
    }

    pub fn with_sections(self, sections: Vec<Section>) -> Self {
        *self.sections.lock().unwrap() = sections;
        self
    }

    pub fn with_catalog(mut self, movies: Vec<ContentItem>, series: Vec<ContentItem>) -> Self {
        self.movies = movies;
        self.series = series;
        self
    }

    pub fn with_section_content(self, section_id: &str, listing: Vec<ContentAssociation>) -> Self {
        self.section_content
            .lock()
            .unwrap()
            .insert(section_id.to_string(), listing);
        self
    }

    /// Make every subsequent call fail.
    pub fn inject_error(&self, message: &str) {
        *self.error_mode.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_error(&self) {
        *self.error_mode.lock().unwrap() = None;
    }

    /// Make only the named method fail; everything else keeps working.
    pub fn fail_method(&self, name: &str) {
        self.failing_methods
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(&format!("{name}:")) || c.as_str() == name)
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, method: &str) -> Result<()> {
        if let Some(message) = self.error_mode.lock().unwrap().clone() {
            return Err(anyhow!("{message}"));
        }
        if self.failing_methods.lock().unwrap().contains(method) {
            return Err(anyhow!("{method} rejected by server"));
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LandingApi for MockApi {
    async fn fetch_landing_pages(&self) -> Result<Vec<Page>> {
        self.record("fetch_landing_pages".to_string());
        self.check("fetch_landing_pages")?;
        Ok(self.pages.lock().unwrap().clone())
    }

    async fn fetch_sections(&self) -> Result<Vec<Section>> {
        self.record("fetch_sections".to_string());
        self.check("fetch_sections")?;
        Ok(self.sections.lock().unwrap().clone())
    }

    async fn fetch_movies(&self) -> Result<Vec<ContentItem>> {
        self.record("fetch_movies".to_string());
        self.check("fetch_movies")?;
        Ok(self.movies.clone())
    }

    async fn fetch_series(&self) -> Result<Vec<ContentItem>> {
        self.record("fetch_series".to_string());
        self.check("fetch_series")?;
        Ok(self.series.clone())
    }

    async fn fetch_section_content(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<ContentAssociation>> {
        self.record(format!("fetch_section_content:{section_id}"));
        self.check("fetch_section_content")?;
        Ok(self
            .section_content
            .lock()
            .unwrap()
            .get(section_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn create_section(&self, request: CreateSection) -> Result<Section> {
        self.record(format!("create_section:{}", request.name));
        self.check("create_section")?;
        let section = Section {
            id: SectionId::new(self.fresh_id("s")),
            name: request.name,
            kind: request.kind,
            selection: request.selection,
        };
        self.sections.lock().unwrap().push(section.clone());
        Ok(section)
    }

    async fn update_section_name(&self, section_id: &SectionId, name: &str) -> Result<()> {
        self.record(format!("update_section_name:{section_id}:{name}"));
        self.check("update_section_name")?;
        if let Some(section) = self
            .sections
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| &s.id == section_id)
        {
            section.name = name.to_string();
        }
        Ok(())
    }

    async fn add_section_to_page(&self, page_id: &PageId, section_id: &SectionId) -> Result<()> {
        self.record(format!("add_section_to_page:{page_id}:{section_id}"));
        self.check("add_section_to_page")?;
        let section = self
            .sections
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.id == section_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown section {section_id}"))?;
        let mut pages = self.pages.lock().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| &p.id == page_id)
            .ok_or_else(|| anyhow!("unknown page {page_id}"))?;
        let position = page.placements.len() as u32;
        page.placements.push(SectionPlacement {
            id: PlacementId::new(self.fresh_id("lp")),
            position,
            section,
        });
        Ok(())
    }

    async fn remove_section_from_page(
        &self,
        page_id: &PageId,
        section_id: &SectionId,
    ) -> Result<()> {
        self.record(format!("remove_section_from_page:{page_id}:{section_id}"));
        self.check("remove_section_from_page")?;
        if let Some(page) = self
            .pages
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| &p.id == page_id)
        {
            page.placements.retain(|p| &p.section.id != section_id);
            page.renumber();
        }
        Ok(())
    }

    async fn reorder_sections(&self, page_id: &PageId, order: &[PlacementId]) -> Result<()> {
        let csv = order
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.record(format!("reorder_sections:{page_id}:{csv}"));
        self.check("reorder_sections")?;
        if let Some(page) = self
            .pages
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| &p.id == page_id)
        {
            page.placements
                .sort_by_key(|p| order.iter().position(|id| id == &p.id).unwrap_or(usize::MAX));
            page.renumber();
        }
        Ok(())
    }

    async fn reorder_section_content(
        &self,
        section_id: &SectionId,
        order: &[AssociationId],
    ) -> Result<()> {
        let csv = order
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.record(format!("reorder_section_content:{section_id}:{csv}"));
        self.check("reorder_section_content")?;
        if let Some(listing) = self
            .section_content
            .lock()
            .unwrap()
            .get_mut(section_id.as_str())
        {
            listing
                .sort_by_key(|a| order.iter().position(|id| id == &a.id).unwrap_or(usize::MAX));
        }
        Ok(())
    }

    async fn add_content_to_section(
        &self,
        section_id: &SectionId,
        pick: &ContentPick,
    ) -> Result<ContentAssociation> {
        self.record(format!(
            "add_content_to_section:{section_id}:{}",
            pick.content_id
        ));
        self.check("add_content_to_section")?;
        let item = self
            .movies
            .iter()
            .chain(self.series.iter())
            .find(|item| item.id == pick.content_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown content {}", pick.content_id))?;
        let mut store = self.section_content.lock().unwrap();
        let listing = store.entry(section_id.to_string()).or_default();
        let association = ContentAssociation {
            id: AssociationId::new(self.fresh_id("a")),
            position: listing.len() as u32,
            content_type: pick.content_type,
            content: item,
        };
        listing.push(association.clone());
        Ok(association)
    }

    async fn remove_content_from_section(
        &self,
        section_id: &SectionId,
        association_id: &AssociationId,
    ) -> Result<()> {
        self.record(format!(
            "remove_content_from_section:{section_id}:{association_id}"
        ));
        self.check("remove_content_from_section")?;
        if let Some(listing) = self
            .section_content
            .lock()
            .unwrap()
            .get_mut(section_id.as_str())
        {
            listing.retain(|a| &a.id != association_id);
        }
        Ok(())
    }

    async fn update_landing_page(&self, page: &Page) -> Result<()> {
        self.record(format!("update_landing_page:{}", page.id));
        self.check("update_landing_page")?;
        let mut pages = self.pages.lock().unwrap();
        if let Some(existing) = pages.iter_mut().find(|p| p.id == page.id) {
            *existing = page.clone();
        }
        Ok(())
    }
}
