//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/pages"))?;
    fs::create_dir_all(target_dir.join("templates/partials"))?;

    // Create default _config.yml
    let config_content = r#"# Site
title: My Blog
subtitle: ''
description: ''
author: John Doe
language: en

# URL
url: http://localhost:3000

# Directory
content_dir: content
templates_dir: templates

# Rendering
default_template: blog

# Feed sync — point this at your publication's RSS feed
feed_url: ''
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Templates
    let base_template = r#"<!DOCTYPE html>
<html lang="{{language}}">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body>
{{> header}}
<main>
{{content}}
</main>
{{> footer}}
</body>
</html>
"#;

    let blog_template = r#"<!DOCTYPE html>
<html lang="{{language}}">
<head>
  <meta charset="utf-8">
  <title>{{title}} - {{site_title}}</title>
</head>
<body>
{{> header}}
<main>
<article>
  <h1>{{title}}</h1>
  <p class="meta">{{date}}{{#if author}} &middot; by {{author}}{{/if}}</p>
  {{content}}
  {{#if original_url}}<p class="origin"><a href="{{original_url}}">Originally published here</a></p>{{/if}}
</article>
</main>
{{> footer}}
</body>
</html>
"#;

    let blog_list_template = r#"<!DOCTYPE html>
<html lang="{{language}}">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body>
{{> header}}
<main>
<h1>Blog</h1>
<ul class="post-list">
{{#each posts}}  <li>
    <a href="{{url}}">{{title}}</a>
    <span class="post-date">{{date}}</span>
    {{#if excerpt}}<p class="post-excerpt">{{excerpt}}</p>{{/if}}
  </li>
{{/each}}</ul>
</main>
{{> footer}}
</body>
</html>
"#;

    fs::write(target_dir.join("templates/base.html"), base_template)?;
    fs::write(target_dir.join("templates/blog.html"), blog_template)?;
    fs::write(
        target_dir.join("templates/blog-list.html"),
        blog_list_template,
    )?;

    // Partials
    let header_partial = r#"<header>
  <h2>{{site_title}}</h2>
  <nav>
    <a href="/">Home</a>
    <a href="/blog">Blog</a>
    <a href="/about">About</a>
    <a href="/faq">FAQ</a>
  </nav>
</header>
"#;

    let footer_partial = r#"<footer>
  <p>&copy; {{site_author}}</p>
</footer>
"#;

    fs::write(
        target_dir.join("templates/partials/header.html"),
        header_partial,
    )?;
    fs::write(
        target_dir.join("templates/partials/footer.html"),
        footer_partial,
    )?;

    // Pages
    let home_page = r#"---
title: Home
---

Welcome to my blog!

## Recent posts

{{posts}}
"#;

    let about_page = r#"---
title: About
---

A few words about this site.
"#;

    let faq_page = r#"---
title: FAQ
---

**What is this?**

A blog.
"#;

    fs::write(target_dir.join("content/pages/home.md"), home_page)?;
    fs::write(target_dir.join("content/pages/about.md"), about_page)?;
    fs::write(target_dir.join("content/pages/faq.md"), faq_page)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
---

This is your first post. Replace it, or run `inkpost sync` to pull posts
from your feed.
"#,
        now.format("%Y-%m-%d")
    );

    fs::write(
        target_dir.join("content/posts/hello-world.md"),
        sample_post,
    )?;

    Ok(())
}
