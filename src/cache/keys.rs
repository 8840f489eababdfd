use crate::models::{PageId, SectionId};
use std::fmt;

/// Type-safe cache key system to replace string-based key construction.
///
/// The string forms are part of the external contract: consumers that share
/// the query cache with this core invalidate by these exact names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Cache key for the full section catalog.
    Sections,

    /// Cache key for the list of landing pages.
    LandingPages,

    /// Cache key for the ordered content listing of one section.
    SectionContent(SectionId),

    /// Cache key for the composed page-data view of one page.
    PageData(PageId),
}

/// Key family, used for class-wide invalidation (every `page-data:*` entry
/// at once, mirroring prefix-style query invalidation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    Sections,
    LandingPages,
    SectionContent,
    PageData,
}

impl CacheKey {
    pub fn class(&self) -> KeyClass {
        match self {
            CacheKey::Sections => KeyClass::Sections,
            CacheKey::LandingPages => KeyClass::LandingPages,
            CacheKey::SectionContent(_) => KeyClass::SectionContent,
            CacheKey::PageData(_) => KeyClass::PageData,
        }
    }

    /// Parse a cache key from its string representation.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "sections" => return Ok(CacheKey::Sections),
            "landing-pages" => return Ok(CacheKey::LandingPages),
            _ => {}
        }

        match s.split_once(':') {
            Some(("section-content", id)) if !id.is_empty() => {
                Ok(CacheKey::SectionContent(SectionId::from(id)))
            }
            Some(("page-data", id)) if !id.is_empty() => Ok(CacheKey::PageData(PageId::from(id))),
            _ => Err(format!("Invalid cache key format: {}", s)),
        }
    }

    /// Extract the section ID from the key, if present.
    pub fn section_id(&self) -> Option<&SectionId> {
        match self {
            CacheKey::SectionContent(id) => Some(id),
            _ => None,
        }
    }

    /// Extract the page ID from the key, if present.
    pub fn page_id(&self) -> Option<&PageId> {
        match self {
            CacheKey::PageData(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Sections => write!(f, "sections"),
            CacheKey::LandingPages => write!(f, "landing-pages"),
            CacheKey::SectionContent(id) => write!(f, "section-content:{}", id.as_str()),
            CacheKey::PageData(id) => write!(f, "page-data:{}", id.as_str()),
        }
    }
}
