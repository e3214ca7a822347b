//! Prompt composition.
//!
//! Pure string templating: the instructions depend on content type and
//! style only, never on the provider or model.

use super::types::{ContentType, GenerationRequest};

/// System message for chat-shaped providers.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates WordPress content, HTML, and CSS.";

const PREAMBLE: &str = "You are a WordPress expert. Generate clean, modern, and responsive code.";

const CLOSING: &str = "Remember: Provide ONLY the code without any markdown formatting, explanations, or comments.";

fn requirements(content_type: ContentType) -> (&'static str, &'static [&'static str]) {
    match content_type {
        ContentType::Block => (
            "Create a Gutenberg block with the following requirements:",
            &[
                "Use modern HTML5 and semantic tags",
                "Include inline CSS for styling",
                "Make it responsive and mobile-friendly",
            ],
        ),
        ContentType::GutenbergPage => (
            "Create a complete WordPress Gutenberg page with:",
            &[
                "Full HTML structure with semantic sections",
                "Multiple sections (hero, features, content, CTA, etc.)",
                "Responsive design with mobile-first approach",
                "Inline CSS styling",
            ],
        ),
        ContentType::ElementorPage => (
            "Create a complete Elementor-compatible page with:",
            &[
                "Full HTML structure optimized for Elementor",
                "Multiple sections using Elementor-friendly markup",
                "Responsive design",
                "CSS classes compatible with Elementor",
            ],
        ),
        ContentType::ElementorWidget => (
            "Create an Elementor-compatible widget with:",
            &[
                "Clean HTML structure",
                "CSS classes for Elementor",
                "Responsive design",
            ],
        ),
    }
}

/// Prepend content-type and style instructions to the user's prompt.
pub fn compose(request: &GenerationRequest) -> String {
    let (heading, items) = requirements(request.content_type);

    let mut out = String::with_capacity(request.prompt.len() + 512);
    out.push_str(PREAMBLE);
    out.push_str("\n\n");
    out.push_str(heading);
    out.push('\n');
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
    out.push_str("- Style: ");
    out.push_str(request.style.as_str());
    out.push('\n');
    out.push_str("- Provide ONLY the HTML and CSS code, no explanations\n\n");

    out.push_str("User request: ");
    out.push_str(request.prompt.trim());
    out.push_str("\n\n");
    out.push_str(CLOSING);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Style;

    fn request(content_type: ContentType, style: Style) -> GenerationRequest {
        GenerationRequest {
            prompt: "  hero section with a signup form ".to_string(),
            content_type,
            style,
            provider: "openai".to_string(),
            model: None,
        }
    }

    #[test]
    fn block_prompt_has_instructions_then_request() {
        let composed = compose(&request(ContentType::Block, Style::Modern));
        assert!(composed.starts_with(PREAMBLE));
        assert!(composed.contains("Create a Gutenberg block"));
        assert!(composed.contains("- Style: modern\n"));

        let instructions = composed.find("Provide ONLY the HTML").unwrap();
        let user = composed
            .find("User request: hero section with a signup form\n")
            .unwrap();
        assert!(instructions < user);
        assert!(composed.ends_with(CLOSING));
    }

    #[test]
    fn page_types_ask_for_multiple_sections() {
        let gutenberg = compose(&request(ContentType::GutenbergPage, Style::Bold));
        assert!(gutenberg.contains("complete WordPress Gutenberg page"));
        assert!(gutenberg.contains("- Style: bold\n"));

        let elementor = compose(&request(ContentType::ElementorPage, Style::Minimal));
        assert!(elementor.contains("Elementor-friendly markup"));
    }

    #[test]
    fn custom_style_is_interpolated() {
        let composed = compose(&request(
            ContentType::ElementorWidget,
            Style::Custom("retro neon".to_string()),
        ));
        assert!(composed.contains("Elementor-compatible widget"));
        assert!(composed.contains("- Style: retro neon\n"));
    }

    #[test]
    fn composition_ignores_provider() {
        let mut a = request(ContentType::Block, Style::Modern);
        let mut b = a.clone();
        a.provider = "gemini".to_string();
        b.provider = "ollama".to_string();
        b.model = Some("llama3.2".to_string());
        assert_eq!(compose(&a), compose(&b));
    }
}
