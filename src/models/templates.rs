use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{ContentKind, SectionKind};

/// Advisory item cap for carousel sections. The hero singleton rule is
/// enforced client-side; the carousel cap is surfaced by the template
/// registry and left to the server to police.
pub const CAROUSEL_CONTENT_CAP: usize = 20;

/// Descriptive metadata for a section type, used by the element palette and
/// carried inside section-template drag payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub kind: SectionKind,
    pub name: String,
    pub description: String,
    pub content_kinds: Vec<ContentKind>,
    pub max_content: usize,
}

static TEMPLATES: Lazy<Vec<SectionTemplate>> = Lazy::new(|| {
    vec![
        SectionTemplate {
            kind: SectionKind::Hero,
            name: "Hero Section".to_string(),
            description: "Full-width hero with background image".to_string(),
            content_kinds: vec![ContentKind::Movie, ContentKind::Series],
            max_content: 1,
        },
        SectionTemplate {
            kind: SectionKind::Carousel,
            name: "Carousel".to_string(),
            description: "Horizontal scrolling carousel".to_string(),
            content_kinds: vec![ContentKind::Movie, ContentKind::Series],
            max_content: CAROUSEL_CONTENT_CAP,
        },
    ]
});

/// All registered section templates, in palette order.
pub fn templates() -> &'static [SectionTemplate] {
    &TEMPLATES
}

/// Look up the template for a section type.
pub fn template_for(kind: SectionKind) -> &'static SectionTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind)
        .expect("every section kind has a registered template")
}
