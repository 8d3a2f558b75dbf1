//! Page renderer — composes content items with templates into final HTML

use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentStore};
use crate::template::{Context, TemplateEngine, TemplateError};
use crate::Blog;

/// Errors a page render can end in; the server maps these to 404/500
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Renders the site's pages. Holds the content store and the template
/// engine (and with it the parsed-template cache); shared across requests.
pub struct PageRenderer {
    config: SiteConfig,
    store: ContentStore,
    engine: TemplateEngine,
}

impl PageRenderer {
    pub fn new(blog: &Blog) -> Self {
        Self {
            config: blog.config.clone(),
            store: ContentStore::new(&blog.content_dir),
            engine: TemplateEngine::new(&blog.templates_dir),
        }
    }

    /// Home page: `home.md` in the `base` template. A `{{posts}}`
    /// placeholder in the page body becomes a linked list of all posts,
    /// newest first. A missing home page falls back to a stock greeting.
    pub async fn home(&self) -> Result<String, RenderError> {
        let page = self.store.load_page("home").await?;

        let body = match &page {
            Some(p) => p.content.clone(),
            None => "<h1>Welcome to my blog!</h1>".to_string(),
        };

        // The page body may carry placeholders of its own
        let body = if body.contains("{{") {
            let mut ctx = self.site_context();
            if let Some(p) = &page {
                ctx.merge(&p.context());
            }
            if body.contains("{{posts}}") {
                ctx.set("posts", self.posts_list_html().await?);
            }
            self.engine.render_str(&body, &ctx).await?
        } else {
            body
        };

        let mut ctx = self.site_context();
        if let Some(p) = &page {
            ctx.merge(&p.context());
        }
        ctx.set("content", body);
        self.engine.render("base", &ctx).await.map_err(Into::into)
    }

    /// Blog index: the `blog-list` template over all posts, newest first
    pub async fn blog_index(&self) -> Result<String, RenderError> {
        let posts = self.store.all_posts().await?;

        let mut ctx = self.site_context();
        ctx.set("title", format!("Blog - {}", self.config.title));
        ctx.set_list(
            "posts",
            posts.iter().map(|p| self.post_context(p)).collect(),
        );

        self.engine
            .render("blog-list", &ctx)
            .await
            .map_err(Into::into)
    }

    /// Single post: the template named by its front matter, or the default
    pub async fn post(&self, slug: &str) -> Result<String, RenderError> {
        let post = self
            .store
            .load_post(slug)
            .await?
            .ok_or_else(|| RenderError::NotFound(format!("post {}", slug)))?;

        let template = post
            .template
            .clone()
            .unwrap_or_else(|| self.config.default_template.clone());

        let mut ctx = self.site_context();
        ctx.merge(&self.post_context(&post));

        self.engine.render(&template, &ctx).await.map_err(Into::into)
    }

    /// Generic page: `content/pages/<name>.md` in the `base` template
    pub async fn page(&self, name: &str) -> Result<String, RenderError> {
        let page = self
            .store
            .load_page(name)
            .await?
            .ok_or_else(|| RenderError::NotFound(format!("page {}", name)))?;

        let mut ctx = self.site_context();
        ctx.merge(&page.context());
        ctx.set("content", page.content.as_str());

        self.engine.render("base", &ctx).await.map_err(Into::into)
    }

    /// Site-wide bindings available to every template.
    ///
    /// The site author is deliberately NOT bound as `author` — that name
    /// belongs to items, so `{{#if author}}` reflects the item alone.
    fn site_context(&self) -> Context {
        let mut ctx = Context::new();
        ctx.set("site_title", self.config.title.as_str());
        ctx.set("site_subtitle", self.config.subtitle.as_str());
        ctx.set("site_description", self.config.description.as_str());
        ctx.set("site_author", self.config.author.as_str());
        ctx.set("site_url", self.config.url.as_str());
        ctx.set("language", self.config.language.as_str());
        ctx.set("title", self.config.title.as_str());
        ctx
    }

    /// Per-post bindings: every item attribute plus the post's URL
    fn post_context(&self, post: &ContentItem) -> Context {
        let mut ctx = post.context();
        ctx.set("url", format!("/blog/{}", post.slug));
        ctx
    }

    async fn posts_list_html(&self) -> Result<String, RenderError> {
        let posts = self.store.all_posts().await?;

        let mut html = String::from("<ul class=\"post-list\">\n");
        for post in &posts {
            let date = post
                .attributes
                .get("date")
                .map(|d| format!(" <span class=\"post-date\">{}</span>", d))
                .unwrap_or_default();
            html.push_str(&format!(
                "  <li><a href=\"/blog/{}\">{}</a>{}</li>\n",
                post.slug,
                html_escape(&post.title),
                date
            ));
        }
        html.push_str("</ul>");

        Ok(html)
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (tempfile::TempDir, PageRenderer) {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        write(
            &base.join("templates/base.html"),
            "<title>{{title}}</title><main>{{content}}</main>",
        );
        write(
            &base.join("templates/blog.html"),
            "<h1>{{title}}</h1>{{#if author}}<p>by {{author}}</p>{{/if}}{{content}}",
        );
        write(
            &base.join("templates/blog-list.html"),
            "<ul>{{#each posts}}<li><a href=\"{{url}}\">{{title}}</a></li>{{/each}}</ul>",
        );
        write(
            &base.join("content/pages/home.md"),
            "---\ntitle: Home\n---\n\nRecent posts:\n\n{{posts}}\n",
        );
        write(
            &base.join("content/pages/about.md"),
            "---\ntitle: About\n---\n\nAll about me.\n",
        );
        write(
            &base.join("content/posts/older-post.md"),
            "---\ntitle: Older Post\ndate: 2024-01-01\n---\n\nOld words.\n",
        );
        write(
            &base.join("content/posts/newer-post.md"),
            "---\ntitle: Newer Post\ndate: 2024-02-01\nauthor: Ada\n---\n\nNew words.\n",
        );

        let blog = Blog::new(base).unwrap();
        let renderer = PageRenderer::new(&blog);
        (dir, renderer)
    }

    #[tokio::test]
    async fn test_home_lists_posts_newest_first() {
        let (_dir, renderer) = site();
        let html = renderer.home().await.unwrap();
        assert!(html.contains("<title>Home</title>"));
        let newer = html.find("Newer Post").unwrap();
        let older = html.find("Older Post").unwrap();
        assert!(newer < older);
        assert!(html.contains("/blog/newer-post"));
    }

    #[tokio::test]
    async fn test_home_without_page_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("templates/base.html"), "{{content}}");
        let blog = Blog::new(dir.path()).unwrap();
        let renderer = PageRenderer::new(&blog);
        let html = renderer.home().await.unwrap();
        assert!(html.contains("Welcome to my blog!"));
    }

    #[tokio::test]
    async fn test_blog_index_each_loop() {
        let (_dir, renderer) = site();
        let html = renderer.blog_index().await.unwrap();
        assert_eq!(html.matches("<li>").count(), 2);
        let newer = html.find("Newer Post").unwrap();
        let older = html.find("Older Post").unwrap();
        assert!(newer < older);
    }

    #[tokio::test]
    async fn test_post_renders_conditional_author() {
        let (_dir, renderer) = site();

        let with_author = renderer.post("newer-post").await.unwrap();
        assert!(with_author.contains("<h1>Newer Post</h1>"));
        assert!(with_author.contains("by Ada"));

        let without_author = renderer.post("older-post").await.unwrap();
        assert!(!without_author.contains("by "));
    }

    #[tokio::test]
    async fn test_post_missing_is_not_found() {
        let (_dir, renderer) = site();
        let err = renderer.post("ghost").await.unwrap_err();
        assert!(matches!(err, RenderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_post_custom_template() {
        let (dir, renderer) = site();
        write(
            &dir.path().join("templates/spotlight.html"),
            "SPOTLIGHT {{title}}",
        );
        write(
            &dir.path().join("content/posts/special.md"),
            "---\ntitle: Special\ntemplate: spotlight\n---\nx",
        );
        let html = renderer.post("special").await.unwrap();
        assert!(html.starts_with("SPOTLIGHT Special"));
    }

    #[tokio::test]
    async fn test_post_missing_template_is_render_error() {
        let (dir, renderer) = site();
        write(
            &dir.path().join("content/posts/broken.md"),
            "---\ntitle: Broken\ntemplate: absent\n---\nx",
        );
        let err = renderer.post("broken").await.unwrap_err();
        assert!(matches!(
            err,
            RenderError::Template(TemplateError::TemplateNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_page_renders_into_base() {
        let (_dir, renderer) = site();
        let html = renderer.page("about").await.unwrap();
        assert!(html.contains("<title>About</title>"));
        assert!(html.contains("All about me."));
    }

    #[tokio::test]
    async fn test_page_missing_is_not_found() {
        let (_dir, renderer) = site();
        let err = renderer.page("ghost").await.unwrap_err();
        assert!(matches!(err, RenderError::NotFound(_)));
    }
}
