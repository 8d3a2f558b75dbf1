//! Content store — loads posts and pages from the content directory

use anyhow::Result;
use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::markdown::first_paragraph;
use super::{ContentItem, FrontMatter, MarkdownRenderer};

/// Reads content items from `posts/` and `pages/` under the content
/// directory. Read-only; every load is a fresh read.
pub struct ContentStore {
    posts_dir: PathBuf,
    pages_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentStore {
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        let content_dir = content_dir.as_ref();
        Self {
            posts_dir: content_dir.join("posts"),
            pages_dir: content_dir.join("pages"),
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Load a single post by slug; `None` if no such file exists
    pub async fn load_post(&self, slug: &str) -> Result<Option<ContentItem>> {
        if !is_safe_slug(slug) {
            return Ok(None);
        }
        self.load_item(&self.posts_dir.join(format!("{}.md", slug)), slug)
            .await
    }

    /// Load a single page by name; `None` if no such file exists
    pub async fn load_page(&self, name: &str) -> Result<Option<ContentItem>> {
        if !is_safe_slug(name) {
            return Ok(None);
        }
        self.load_item(&self.pages_dir.join(format!("{}.md", name)), name)
            .await
    }

    /// Load every post, sorted by descending date (newest first)
    pub async fn all_posts(&self) -> Result<Vec<ContentItem>> {
        let mut dir = match tokio::fs::read_dir(&self.posts_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut posts = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !is_markdown_file(&path) {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load_item(&path, slug).await {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load every page, sorted by name
    pub async fn all_pages(&self) -> Result<Vec<ContentItem>> {
        let mut dir = match tokio::fs::read_dir(&self.pages_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut pages = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !is_markdown_file(&path) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load_item(&path, name).await {
                Ok(Some(page)) => pages.push(page),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to load page {:?}: {}", path, e);
                }
            }
        }

        pages.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(pages)
    }

    async fn load_item(&self, path: &Path, slug: &str) -> Result<Option<ContentItem>> {
        let source = match tokio::fs::read_to_string(path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (fm, body) = FrontMatter::parse(&source);

        let title = fm.title.clone().unwrap_or_else(|| slug.to_string());
        let date = fm.parse_date();
        let content = self.renderer.render(body);
        let excerpt = first_paragraph(&content);

        let mut attributes = IndexMap::new();
        attributes.insert("title".to_string(), title.clone());
        if let Some(d) = &fm.date {
            attributes.insert("date".to_string(), d.clone());
        }
        if let Some(a) = &fm.author {
            attributes.insert("author".to_string(), a.clone());
        }
        if let Some(t) = &fm.template {
            attributes.insert("template".to_string(), t.clone());
        }
        if let Some(u) = &fm.original_url {
            attributes.insert("original_url".to_string(), u.clone());
        }
        for (key, value) in &fm.extra {
            if let Some(s) = yaml_value_string(value) {
                attributes.insert(key.clone(), s);
            }
        }

        Ok(Some(ContentItem {
            slug: slug.to_string(),
            title,
            date,
            template: fm.template,
            attributes,
            content,
            excerpt,
        }))
    }
}

/// Scalar front-matter values become template variables; nested
/// structures are skipped
fn yaml_value_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Slugs come from request paths; keep them to bare file stems
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}
