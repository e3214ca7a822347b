//! Page drafts built from generated markup.
//!
//! Full-page requests come back with a draft the host can insert as an
//! unpublished page: a title derived from the prompt, content shaped for
//! the target builder, and the builder's post meta.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::llm::ContentType;

const TITLE_WORDS: usize = 5;
const TITLE_MAX_CHARS: usize = 50;
const TITLE_CUT_CHARS: usize = 47;
const TITLE_SUFFIX: &str = " - Generated by NeuroBlock";

/// Page builder the draft targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builder {
    Gutenberg,
    Elementor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageDraft {
    pub id: String,
    pub title: String,
    pub content: String,
    pub builder: Builder,
    pub status: DraftStatus,
    /// Post meta to set on insert.
    pub meta: Vec<(String, String)>,
    pub created_at: DateTime<Utc>,
}

impl PageDraft {
    /// Build a draft for page content types. Returns `None` for snippets
    /// and for empty generations.
    pub fn from_generation(content_type: ContentType, prompt: &str, text: &str) -> Option<Self> {
        let builder = match content_type {
            ContentType::GutenbergPage => Builder::Gutenberg,
            ContentType::ElementorPage => Builder::Elementor,
            ContentType::Block | ContentType::ElementorWidget => return None,
        };
        if text.trim().is_empty() {
            return None;
        }

        let (content, meta) = match builder {
            Builder::Gutenberg => (format!("<!-- wp:html -->{text}<!-- /wp:html -->"), Vec::new()),
            Builder::Elementor => (
                text.to_string(),
                vec![
                    ("_elementor_edit_mode".to_string(), "builder".to_string()),
                    ("_elementor_template_type".to_string(), "wp-page".to_string()),
                ],
            ),
        };

        Some(Self {
            id: format!("draft_{}", ulid::Ulid::new()),
            title: draft_title(prompt),
            content,
            builder,
            status: DraftStatus::Draft,
            meta,
            created_at: Utc::now(),
        })
    }
}

/// Title from the first few words of the prompt.
pub fn draft_title(prompt: &str) -> String {
    let mut title = prompt
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if title.chars().count() > TITLE_MAX_CHARS {
        title = title.chars().take(TITLE_CUT_CHARS).collect::<String>() + "...";
    }

    let mut chars = title.chars();
    let title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    title + TITLE_SUFFIX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_takes_first_five_words() {
        assert_eq!(
            draft_title("landing page for a coffee shop in Lisbon"),
            "Landing page for a coffee - Generated by NeuroBlock"
        );
    }

    #[test]
    fn long_title_is_cut() {
        let title = draft_title("supercalifragilisticexpialidocious antidisestablishmentarianism words");
        let head = title.strip_suffix(TITLE_SUFFIX).unwrap();
        assert_eq!(head.chars().count(), 50);
        assert!(head.ends_with("..."));
        assert!(head.starts_with('S'));
    }

    #[test]
    fn snippets_get_no_draft() {
        assert!(PageDraft::from_generation(ContentType::Block, "hero", "<div/>").is_none());
        assert!(
            PageDraft::from_generation(ContentType::ElementorWidget, "hero", "<div/>").is_none()
        );
    }

    #[test]
    fn empty_generation_gets_no_draft() {
        assert!(PageDraft::from_generation(ContentType::GutenbergPage, "hero", "  ").is_none());
    }

    #[test]
    fn gutenberg_content_is_wrapped_in_html_block() {
        let draft =
            PageDraft::from_generation(ContentType::GutenbergPage, "about us", "<main/>").unwrap();
        assert_eq!(draft.builder, Builder::Gutenberg);
        assert_eq!(draft.content, "<!-- wp:html --><main/><!-- /wp:html -->");
        assert!(draft.meta.is_empty());
        assert_eq!(draft.status, DraftStatus::Draft);
        assert!(draft.id.starts_with("draft_"));
    }

    #[test]
    fn elementor_draft_carries_builder_meta() {
        let draft =
            PageDraft::from_generation(ContentType::ElementorPage, "about us", "<main/>").unwrap();
        assert_eq!(draft.content, "<main/>");
        assert!(
            draft
                .meta
                .contains(&("_elementor_edit_mode".to_string(), "builder".to_string()))
        );

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["builder"], "elementor");
        assert_eq!(json["status"], "draft");
    }
}
