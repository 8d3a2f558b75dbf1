//! HTTP server

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::render::{PageRenderer, RenderError};
use crate::Blog;

/// Shared server state
struct ServerState {
    renderer: PageRenderer,
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        renderer: PageRenderer::new(blog),
    });

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Route table. axum matches by specificity, so the `/:page` catch-all
/// cannot shadow `/blog` or `/blog/:slug`.
fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .route("/:page", get(page))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(state): State<Arc<ServerState>>) -> Response {
    respond(state.renderer.home().await)
}

async fn blog_index(State(state): State<Arc<ServerState>>) -> Response {
    respond(state.renderer.blog_index().await)
}

async fn blog_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    respond(state.renderer.post(&slug).await)
}

async fn page(State(state): State<Arc<ServerState>>, Path(page): Path<String>) -> Response {
    respond(state.renderer.page(&page).await)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Page not found").into_response()
}

/// Map a render result onto the HTTP boundary: missing content is a 404,
/// any other failure a 500, both as plain text without internals.
fn respond(result: Result<String, RenderError>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(RenderError::NotFound(what)) => {
            tracing::debug!("Not found: {}", what);
            (StatusCode::NOT_FOUND, "Page not found").into_response()
        }
        Err(e) => {
            tracing::error!("Render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading page").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::fs;
    use tower::ServiceExt;

    fn test_router() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("templates")).unwrap();
        fs::create_dir_all(base.join("content/pages")).unwrap();
        fs::create_dir_all(base.join("content/posts")).unwrap();

        fs::write(
            base.join("templates/base.html"),
            "<title>{{title}}</title>{{content}}",
        )
        .unwrap();
        fs::write(base.join("templates/blog.html"), "<h1>{{title}}</h1>{{content}}").unwrap();
        fs::write(
            base.join("templates/blog-list.html"),
            "{{#each posts}}<li>{{title}}</li>{{/each}}",
        )
        .unwrap();
        fs::write(
            base.join("content/pages/about.md"),
            "---\ntitle: About\n---\nAbout body",
        )
        .unwrap();
        fs::write(
            base.join("content/posts/hello.md"),
            "---\ntitle: Hello Post\ndate: 2024-01-01\n---\nPost body",
        )
        .unwrap();

        let blog = Blog::new(base).unwrap();
        let state = Arc::new(ServerState {
            renderer: PageRenderer::new(&blog),
        });
        (dir, router(state))
    }

    async fn get_path(router: Router, path: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_existing_post_is_200_with_title() {
        let (_dir, router) = test_router();
        let (status, body) = get_path(router, "/blog/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Hello Post"));
    }

    #[tokio::test]
    async fn test_missing_post_is_404() {
        let (_dir, router) = test_router();
        let (status, body) = get_path(router, "/blog/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Page not found");
    }

    #[tokio::test]
    async fn test_blog_index_route() {
        let (_dir, router) = test_router();
        let (status, body) = get_path(router, "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li>Hello Post</li>"));
    }

    #[tokio::test]
    async fn test_page_route() {
        let (_dir, router) = test_router();
        let (status, body) = get_path(router, "/about").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("About body"));
    }

    #[tokio::test]
    async fn test_missing_page_is_404() {
        let (_dir, router) = test_router();
        let (status, _) = get_path(router, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_404() {
        let (_dir, router) = test_router();
        let (status, body) = get_path(router, "/a/b/c").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Page not found");
    }

    #[tokio::test]
    async fn test_broken_template_is_500() {
        let (dir, router) = test_router();
        fs::write(
            dir.path().join("content/posts/bad.md"),
            "---\ntitle: Bad\ntemplate: nothere\n---\nx",
        )
        .unwrap();
        let (status, body) = get_path(router, "/blog/bad").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error loading page");
    }
}
