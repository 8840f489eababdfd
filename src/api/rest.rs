use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::traits::{ContentPick, CreateSection, LandingApi};
use crate::constants::HTTP_TIMEOUT_SECS;
use crate::models::{
    AssociationId, ContentAssociation, ContentId, ContentItem, ContentKind, Page, PageId,
    PlacementId, Section, SectionId,
};

/// REST client for the landing-page backend.
#[derive(Clone)]
pub struct RestApi {
    client: reqwest::Client,
    base_url: String,
}

impl RestApi {
    pub fn new(base_url: &str) -> Result<Self> {
        // validate early so a bad URL fails at construction, not first call
        let parsed = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("GET {} failed: {}", path, response.status()));
        }
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("POST {} failed: {}", path, response.status()));
        }
        Ok(response)
    }
}

// === Wire types ===

#[derive(Debug, Deserialize)]
struct WirePage {
    id: PageId,
    name: String,
    #[serde(default)]
    is_active: bool,
    #[serde(default, rename = "landingpagesection_set")]
    placements: Vec<WirePlacement>,
}

#[derive(Debug, Deserialize)]
struct WirePlacement {
    id: PlacementId,
    #[serde(default)]
    position: u32,
    section: Section,
}

impl From<WirePage> for Page {
    fn from(wire: WirePage) -> Self {
        let mut placements: Vec<_> = wire
            .placements
            .into_iter()
            .map(|p| crate::models::SectionPlacement {
                id: p.id,
                position: p.position,
                section: p.section,
            })
            .collect();
        placements.sort_by_key(|p| p.position);

        let mut page = Page {
            id: wire.id,
            name: wire.name,
            is_active: wire.is_active,
            placements,
        };
        page.renumber();
        page
    }
}

/// Catalog rows arrive without a kind discriminator; the movies and series
/// endpoints are separate and the kind is tagged on this side.
#[derive(Debug, Deserialize)]
struct WireCatalogItem {
    id: ContentId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    poster_url: Option<String>,
    #[serde(default)]
    background_image_url: Option<String>,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl WireCatalogItem {
    fn into_item(self, kind: ContentKind) -> ContentItem {
        ContentItem {
            id: self.id,
            title: self.title,
            description: self.description,
            kind,
            poster_url: self.poster_url,
            background_image_url: self.background_image_url,
            created_at: self.created_at,
        }
    }
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SectionOrderBody {
    section_order: String,
}

#[derive(Serialize)]
struct ContentOrderBody {
    content_order: String,
}

fn join_ids<I: AsRef<str>>(ids: &[I]) -> String {
    ids.iter()
        .map(|id| id.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl LandingApi for RestApi {
    async fn fetch_landing_pages(&self) -> Result<Vec<Page>> {
        let pages: Vec<WirePage> = self.get_json("landing-pages/").await?;
        Ok(pages.into_iter().map(Page::from).collect())
    }

    async fn fetch_sections(&self) -> Result<Vec<Section>> {
        self.get_json("sections/").await
    }

    async fn fetch_movies(&self) -> Result<Vec<ContentItem>> {
        let rows: Vec<WireCatalogItem> = self.get_json("movies/").await?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_item(ContentKind::Movie))
            .collect())
    }

    async fn fetch_series(&self) -> Result<Vec<ContentItem>> {
        let rows: Vec<WireCatalogItem> = self.get_json("series/").await?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_item(ContentKind::Series))
            .collect())
    }

    async fn fetch_section_content(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<ContentAssociation>> {
        self.get_json(&format!("sections/{}/content/", section_id))
            .await
    }

    async fn create_section(&self, request: CreateSection) -> Result<Section> {
        let response = self.post_json("sections/create/", &request).await?;
        Ok(response.json().await?)
    }

    async fn update_section_name(&self, section_id: &SectionId, name: &str) -> Result<()> {
        self.post_json(
            &format!("sections/{}/update/", section_id),
            &RenameBody { name },
        )
        .await?;
        Ok(())
    }

    async fn add_section_to_page(&self, page_id: &PageId, section_id: &SectionId) -> Result<()> {
        self.post_json(
            &format!("landing-pages/{}/sections/{}/add/", page_id, section_id),
            &serde_json::json!({}),
        )
        .await?;
        Ok(())
    }

    async fn remove_section_from_page(
        &self,
        page_id: &PageId,
        section_id: &SectionId,
    ) -> Result<()> {
        self.post_json(
            &format!("landing-pages/{}/sections/{}/remove/", page_id, section_id),
            &serde_json::json!({}),
        )
        .await?;
        Ok(())
    }

    async fn reorder_sections(&self, page_id: &PageId, order: &[PlacementId]) -> Result<()> {
        self.post_json(
            &format!("landing-pages/{}/sections/reorder/", page_id),
            &SectionOrderBody {
                section_order: join_ids(order),
            },
        )
        .await?;
        Ok(())
    }

    async fn reorder_section_content(
        &self,
        section_id: &SectionId,
        order: &[AssociationId],
    ) -> Result<()> {
        self.post_json(
            &format!("sections/{}/content/reorder/", section_id),
            &ContentOrderBody {
                content_order: join_ids(order),
            },
        )
        .await?;
        Ok(())
    }

    async fn add_content_to_section(
        &self,
        section_id: &SectionId,
        pick: &ContentPick,
    ) -> Result<ContentAssociation> {
        let response = self
            .post_json(&format!("sections/{}/content/add/", section_id), pick)
            .await?;
        Ok(response.json().await?)
    }

    async fn remove_content_from_section(
        &self,
        section_id: &SectionId,
        association_id: &AssociationId,
    ) -> Result<()> {
        self.post_json(
            &format!("sections/{}/content/{}/remove/", section_id, association_id),
            &serde_json::json!({}),
        )
        .await?;
        Ok(())
    }

    async fn update_landing_page(&self, page: &Page) -> Result<()> {
        self.post_json(&format!("landing-pages/{}/update/", page.id), page)
            .await?;
        Ok(())
    }
}
