//! Content item model

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::template::Context;

/// A single piece of content — a post or a page — as loaded from disk.
///
/// Items are built per request and never mutated.
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Filename stem, also the URL path segment
    pub slug: String,

    /// Item title, from front matter or the filename
    pub title: String,

    /// Publication date, when the front matter carries a parseable one
    pub date: Option<NaiveDate>,

    /// Template named by the front matter, if any
    pub template: Option<String>,

    /// Every front-matter field as a string, in file order
    pub attributes: IndexMap<String, String>,

    /// Rendered body HTML
    pub content: String,

    /// First paragraph of the rendered body
    pub excerpt: Option<String>,
}

impl ContentItem {
    /// Build the template context for this item: every front-matter
    /// attribute, plus slug, content, and excerpt.
    pub fn context(&self) -> Context {
        let mut ctx = Context::new();
        for (key, value) in &self.attributes {
            ctx.set(key, value.as_str());
        }
        ctx.set("slug", self.slug.as_str());
        ctx.set("content", self.content.as_str());
        if let Some(excerpt) = &self.excerpt {
            ctx.set("excerpt", excerpt.as_str());
        }
        ctx
    }
}
