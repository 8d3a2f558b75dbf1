//! Markdown rendering

use lazy_static::lazy_static;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

lazy_static! {
    static ref FIRST_PARAGRAPH: Regex = Regex::new(r"(?s)<p>(.*?)</p>").unwrap();
}

/// Markdown renderer
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the first paragraph of rendered HTML, used as the item excerpt
pub fn first_paragraph(html: &str) -> Option<String> {
    FIRST_PARAGRAPH
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_links() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("[home](/about)");
        assert!(html.contains(r#"<a href="/about">home</a>"#));
    }

    #[test]
    fn test_first_paragraph() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Title\n\nFirst para.\n\nSecond para.");
        assert_eq!(first_paragraph(&html), Some("First para.".to_string()));
    }

    #[test]
    fn test_first_paragraph_none_without_paragraphs() {
        assert_eq!(first_paragraph("<h1>only a heading</h1>"), None);
    }
}
