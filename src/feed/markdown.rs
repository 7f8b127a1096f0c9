//! Raw markdown export at `/<slug>/index.md`

use std::collections::BTreeMap;

use crate::content::{Post, PublishFilter};
use crate::error::NotFoundError;
use crate::helpers::resolve_path;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Body of a markdown export route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownResponse<'a> {
    pub content_type: &'static str,
    pub body: &'a str,
}

impl<'a> MarkdownResponse<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.body.as_bytes()
    }
}

/// Markdown export routes of the visible posts, keyed by slug
pub struct MarkdownExport<'a> {
    routes: BTreeMap<String, &'a Post>,
}

impl<'a> MarkdownExport<'a> {
    /// Build routes for every post the filter lets through
    pub fn new(posts: &'a [Post], filter: &PublishFilter) -> Self {
        let mut routes = BTreeMap::new();
        for post in filter.visible(posts) {
            let key = route_key(&resolve_path(post));
            if routes.contains_key(&key) {
                tracing::warn!("Skipping {:?}: route /{}/ is already taken", post.source, key);
                continue;
            }
            routes.insert(key, post);
        }
        Self { routes }
    }

    /// Slugs with a route, in sorted order
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Public paths of every route, e.g. `/my-slug/index.md`
    pub fn routes(&self) -> Vec<String> {
        self.slugs().map(|s| format!("/{}/index.md", s)).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Look up the markdown of a visible post
    pub fn get(&self, slug: &str) -> Result<MarkdownResponse<'a>, NotFoundError> {
        self.routes
            .get(route_key(slug).as_str())
            .map(|&post| MarkdownResponse {
                content_type: MARKDOWN_CONTENT_TYPE,
                body: &post.body,
            })
            .ok_or_else(|| NotFoundError {
                slug: slug.to_string(),
            })
    }

    /// Routes with their posts, in slug order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Post)> + '_ {
        self.routes.iter().map(|(slug, post)| (slug.as_str(), *post))
    }
}

fn route_key(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}
