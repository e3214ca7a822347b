//! Common types for content generation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GenerateError;

/// What kind of markup the caller wants back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// A single Gutenberg block.
    #[default]
    #[serde(rename = "block")]
    Block,
    /// An Elementor widget.
    #[serde(rename = "elementor")]
    ElementorWidget,
    /// A full page for the block editor.
    #[serde(rename = "page-gutenberg")]
    GutenbergPage,
    /// A full page for Elementor.
    #[serde(rename = "page-elementor")]
    ElementorPage,
}

impl ContentType {
    pub fn is_page(self) -> bool {
        matches!(self, ContentType::GutenbergPage | ContentType::ElementorPage)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Block => "block",
            ContentType::ElementorWidget => "elementor",
            ContentType::GutenbergPage => "page-gutenberg",
            ContentType::ElementorPage => "page-elementor",
        }
    }
}

/// Cosmetic style preset.
///
/// Only ever interpolated into the composed prompt, so unknown presets are
/// kept verbatim instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Style {
    #[default]
    Modern,
    Minimal,
    Corporate,
    Creative,
    Elegant,
    Bold,
    Custom(String),
}

impl Style {
    pub fn as_str(&self) -> &str {
        match self {
            Style::Modern => "modern",
            Style::Minimal => "minimal",
            Style::Corporate => "corporate",
            Style::Creative => "creative",
            Style::Elegant => "elegant",
            Style::Bold => "bold",
            Style::Custom(s) => s,
        }
    }
}

impl From<String> for Style {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "modern" => Style::Modern,
            "minimal" => Style::Minimal,
            "corporate" => Style::Corporate,
            "creative" => Style::Creative,
            "elegant" => Style::Elegant,
            "bold" => Style::Bold,
            _ => Style::Custom(value.trim().to_string()),
        }
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub content_type: ContentType,
    pub style: Style,
    pub provider: String,
    /// Requested model; falls back to the provider's first model when absent
    /// or unsupported.
    pub model: Option<String>,
}

/// Sampling parameters passed explicitly into every generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationDefaults {
    pub const MAX_TOKENS: u32 = 2000;
    pub const TEMPERATURE: f32 = 0.7;
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: Self::MAX_TOKENS,
            temperature: Self::TEMPERATURE,
        }
    }
}

/// Successful generation.
///
/// `text` may be empty when the upstream answer had an unexpected shape;
/// callers treat that as "nothing generated", not as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub text: String,
    pub provider: String,
    pub model: String,
}

pub type GenerationResult = Result<Generation, GenerateError>;

/// A message in a chat-shaped request.
#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}
