//! Feed importer — pulls posts from a remote RSS feed into the content store

use anyhow::{Context as _, Result};
use rss::Channel;
use std::path::Path;
use std::time::Duration;

use crate::Blog;

const FETCH_TIMEOUT_SECONDS: u64 = 30;

/// One feed entry, normalized for import
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    /// Entry body as HTML, exactly as the feed carries it
    pub content: String,
    /// Publication date at date-only precision (YYYY-MM-DD)
    pub date: String,
    pub url: String,
}

/// What saving one entry did
#[derive(Debug, PartialEq)]
pub enum SyncOutcome {
    Saved,
    Skipped,
}

/// Run a sync: fetch the feed and write any posts not yet in the store.
///
/// Fetch or parse failures end the run gracefully with nothing imported;
/// a failure on one entry is logged and does not stop the others.
pub async fn run(blog: &Blog, url_override: Option<&str>) -> Result<()> {
    let url = url_override.unwrap_or(&blog.config.feed_url);
    if url.is_empty() {
        anyhow::bail!("no feed URL: set feed_url in _config.yml or pass --url");
    }

    let entries = match fetch_feed(url).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Error fetching feed {}: {}", url, e);
            Vec::new()
        }
    };

    let posts_dir = blog.posts_dir();
    tokio::fs::create_dir_all(&posts_dir).await?;

    let mut saved = 0;
    let mut skipped = 0;
    let mut failed = 0;
    for entry in &entries {
        match save_post(&posts_dir, entry, &blog.config.author).await {
            Ok(SyncOutcome::Saved) => {
                println!("Saved post: {}", entry.title);
                saved += 1;
            }
            Ok(SyncOutcome::Skipped) => {
                println!("Post already exists: {}", entry.title);
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to save post {}: {}", entry.title, e);
                failed += 1;
            }
        }
    }

    println!(
        "Sync completed: {} saved, {} skipped, {} failed",
        saved, skipped, failed
    );

    Ok(())
}

/// Fetch and parse the remote feed
pub async fn fetch_feed(url: &str) -> Result<Vec<FeedEntry>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch feed from {}", url))?
        .error_for_status()
        .with_context(|| format!("Feed request to {} failed", url))?;

    let bytes = response
        .bytes()
        .await
        .with_context(|| "Failed to read feed body")?;

    let channel = Channel::read_from(&bytes[..])
        .with_context(|| format!("Failed to parse feed from {}", url))?;

    Ok(parse_entries(&channel))
}

/// Normalize the channel's items; items without a title are dropped
fn parse_entries(channel: &Channel) -> Vec<FeedEntry> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let content = item
                .content()
                .or_else(|| item.description())
                .unwrap_or_default()
                .to_string();
            let date = item
                .pub_date()
                .and_then(|d| chrono::DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let url = item.link().unwrap_or_default().to_string();
            Some(FeedEntry {
                title,
                content,
                date,
                url,
            })
        })
        .collect()
}

/// Write one entry into the posts directory, keyed by its title slug.
/// An existing file for the slug is left untouched.
pub async fn save_post(
    posts_dir: &Path,
    entry: &FeedEntry,
    author: &str,
) -> Result<SyncOutcome> {
    let slug = slug::slugify(&entry.title);
    let path = posts_dir.join(format!("{}.md", slug));

    if tokio::fs::try_exists(&path).await? {
        return Ok(SyncOutcome::Skipped);
    }

    tokio::fs::write(&path, post_markdown(entry, author))
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;

    Ok(SyncOutcome::Saved)
}

/// Front matter plus the entry body converted from HTML to Markdown
pub fn post_markdown(entry: &FeedEntry, author: &str) -> String {
    format!(
        "---\ntitle: {title}\ndate: {date}\nauthor: {author}\ntemplate: blog\noriginal_url: {url}\n---\n\n{body}\n",
        title = yaml_scalar(&entry.title),
        date = entry.date,
        author = yaml_scalar(author),
        url = entry.url,
        body = html2md::parse_html(&entry.content).trim(),
    )
}

/// Quote a YAML scalar when it would otherwise change meaning
fn yaml_scalar(s: &str) -> String {
    let needs_quoting = s.contains(':')
        || s.contains('#')
        || s.contains('"')
        || s.starts_with(['\'', '&', '*', '[', '{', '>', '|', '%', '@'])
        || s.trim() != s;
    if needs_quoting {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        s.to_string()
    }
}
