//! URL helper functions

use crate::content::Post;

/// Public path of a post
///
/// # Examples
/// ```ignore
/// resolve_path(&post) // -> "/my-slug/"
/// ```
pub fn resolve_path(post: &Post) -> String {
    let slug = post.data.slug.trim().trim_matches('/');
    let key = if slug.is_empty() {
        post.id.trim_matches('/')
    } else {
        slug
    };
    format!("/{}/", key)
}

/// Whether `segment` is usable as a single public path segment.
///
/// Rejects separators and `.`/`..`, since routes become directories
/// under the public dir.
pub fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

/// Path of a post's raw markdown export
pub fn markdown_path(post: &Post) -> String {
    format!("{}index.md", resolve_path(post))
}

/// Join a site-relative path onto the site URL
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(site: &str, path: &str) -> String {
    let base = site.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}
