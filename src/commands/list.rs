//! List site content

use anyhow::Result;

use crate::content::ContentStore;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let store = ContentStore::new(&blog.content_dir);

    match content_type {
        "post" | "posts" => {
            let posts = store.all_posts().await?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = post
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "no date".to_string());
                println!("  {} - {} [{}]", date, post.title, post.slug);
            }
        }
        "page" | "pages" => {
            let pages = store.all_pages().await?;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(())
}
