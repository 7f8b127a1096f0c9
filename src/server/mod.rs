//! Preview server
//!
//! Serves the markdown and RSS routes straight from the loaded collection in
//! preview mode, so scheduled posts show up but drafts stay hidden. The
//! collection is reloaded whenever the content directory changes.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use notify_debouncer_mini::{
    new_debouncer,
    notify::{RecursiveMode, Watcher},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::content::{Post, PublishFilter};
use crate::feed::{self, MarkdownExport, RSS_CONTENT_TYPE};
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    posts: RwLock<Vec<Post>>,
}

impl ServerState {
    fn filter(&self) -> PublishFilter {
        PublishFilter::from_config(&self.blog.config, Utc::now(), true)
    }
}

/// Start the preview server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let posts = blog.load_posts()?;

    let state = Arc::new(ServerState {
        blog: blog.clone(),
        posts: RwLock::new(posts),
    });

    let app = router(state.clone());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Preview server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    if watch && blog.content_dir.exists() {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/rss.xml", get(rss_handler))
        .route("/:slug/index.md", get(markdown_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch the content directory and reload the collection on change
fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&state.blog.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", state.blog.content_dir);

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.contains(".obsidian")
                        && !path_str.ends_with('~')
                });
                if relevant {
                    reload(&state);
                }
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

/// Swap in a freshly loaded collection, keeping the old one on failure
fn reload(state: &ServerState) {
    match state.blog.load_posts() {
        Ok(posts) => {
            let count = posts.len();
            *state.posts.blocking_write() = posts;
            tracing::info!("Reloaded {} posts", count);
        }
        Err(e) => {
            tracing::error!("Reload failed, still serving previous content: {:#}", e);
        }
    }
}

/// Plain-text list of the available routes
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let posts = state.posts.read().await;
    let export = MarkdownExport::new(posts.as_slice(), &state.filter());

    let mut body = String::from("/rss.xml\n");
    for route in export.routes() {
        body.push_str(&route);
        body.push('\n');
    }

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

async fn rss_handler(State(state): State<Arc<ServerState>>) -> Response {
    let posts = state.posts.read().await;

    match feed::render_rss(&state.blog.config, posts.as_slice(), &state.filter()) {
        Ok(xml) => ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response(),
        Err(e) => {
            tracing::error!("Failed to render rss.xml: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render feed").into_response()
        }
    }
}

async fn markdown_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let posts = state.posts.read().await;
    let export = MarkdownExport::new(posts.as_slice(), &state.filter());

    match export.get(&slug) {
        Ok(markdown) => (
            [(header::CONTENT_TYPE, markdown.content_type)],
            markdown.body.to_string(),
        )
            .into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::filter::tests::post;

    fn state(posts: Vec<Post>) -> Arc<ServerState> {
        let base_dir = std::env::temp_dir().join("privctx-server-test");
        Arc::new(ServerState {
            blog: Blog {
                config: crate::config::SiteConfig::default(),
                content_dir: base_dir.join("BLOG"),
                public_dir: base_dir.join("public"),
                base_dir,
                content_override: None,
            },
            posts: RwLock::new(posts),
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn collection() -> Vec<Post> {
        let now = Utc::now();
        vec![
            post("live", false, Some(now - chrono::Duration::days(1))),
            post("scheduled", false, Some(now + chrono::Duration::days(1))),
            post("draft", true, Some(now - chrono::Duration::days(1))),
        ]
    }

    #[tokio::test]
    async fn test_markdown_route() {
        let response = markdown_handler(State(state(collection())), Path("live".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/markdown; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "# live\n");
    }

    #[tokio::test]
    async fn test_preview_serves_scheduled_but_not_drafts() {
        let state = state(collection());
        let response =
            markdown_handler(State(state.clone()), Path("scheduled".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = markdown_handler(State(state), Path("draft".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rss_route() {
        let response = rss_handler(State(state(collection()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );
        let xml = body_string(response).await;
        let scheduled = xml.find("/scheduled/").unwrap();
        let live = xml.find("/live/").unwrap();
        assert!(scheduled < live);
        assert!(!xml.contains("/draft/"));
    }

    #[tokio::test]
    async fn test_index_lists_routes() {
        let response = index_handler(State(state(collection()))).await;
        let body = body_string(response).await;
        assert_eq!(body, "/rss.xml\n/live/index.md\n/scheduled/index.md\n");
    }
}
