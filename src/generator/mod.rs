//! Generator module - writes the public routes of the visible collection

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{Post, PublishFilter};
use crate::feed::{self, MarkdownExport};
use crate::helpers::is_path_segment;
use crate::Blog;

/// What a generation run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Number of `/<slug>/index.md` routes written
    pub markdown_routes: usize,
    /// Number of items in rss.xml
    pub feed_items: usize,
}

/// Static route generator
pub struct Generator {
    blog: Blog,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Self {
        Self { blog: blog.clone() }
    }

    /// Generate every route for the posts visible under `filter`
    pub fn generate(&self, posts: &[Post], filter: &PublishFilter) -> Result<GenerateSummary> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let markdown_routes = self.generate_markdown_routes(posts, filter)?;
        let feed_items = self.generate_rss_feed(posts, filter)?;

        Ok(GenerateSummary {
            markdown_routes,
            feed_items,
        })
    }

    /// Generate `/<slug>/index.md` for each visible post and remove routes
    /// left over from posts that are no longer visible
    fn generate_markdown_routes(&self, posts: &[Post], filter: &PublishFilter) -> Result<usize> {
        let export = MarkdownExport::new(posts, filter);

        let mut written = 0;
        for (slug, post) in export.iter() {
            if !is_path_segment(slug) {
                tracing::warn!("Skipping {:?}: {:?} is not a single path segment", post.source, slug);
                continue;
            }
            let output_path = self.blog.public_dir.join(slug).join("index.md");
            write_file(&output_path, post.body.as_bytes())?;
            tracing::debug!("Generated markdown: {:?}", output_path);
            written += 1;
        }

        let removed = self.prune_stale_routes(&export)?;
        if removed > 0 {
            tracing::info!("Removed {} stale markdown routes", removed);
        }

        tracing::info!("Generated {} markdown routes", written);
        Ok(written)
    }

    /// Delete `<public>/<slug>/index.md` files whose slug has no route
    fn prune_stale_routes(&self, export: &MarkdownExport) -> Result<usize> {
        let base = glob::Pattern::escape(&self.blog.public_dir.to_string_lossy());
        let pattern = format!("{}/*/index.md", base);

        let existing = glob::glob(&pattern)?.collect::<Result<Vec<PathBuf>, _>>()?;

        let mut removed = 0;
        for path in existing {
            let Some(dir) = path.parent() else {
                continue;
            };
            let slug = dir
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            if export.get(&slug).is_ok() {
                continue;
            }

            fs::remove_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to remove {:?}: {}", path, e))?;
            tracing::debug!("Removed stale route: {:?}", path);
            removed += 1;

            // Leave directories that hold anything else alone
            if fs::read_dir(dir)?.next().is_none() {
                fs::remove_dir(dir)?;
            }
        }

        Ok(removed)
    }

    /// Generate rss.xml
    fn generate_rss_feed(&self, posts: &[Post], filter: &PublishFilter) -> Result<usize> {
        let items = feed::rss::project(posts, filter);
        let xml = feed::RssChannel::from_config(&self.blog.config)
            .render(&items)
            .map_err(|e| anyhow::anyhow!("Failed to render rss.xml: {}", e))?;

        let output_path = self.blog.public_dir.join("rss.xml");
        write_file(&output_path, &xml)?;
        tracing::info!("Generated rss.xml with {} items", items.len());

        Ok(items.len())
    }

    /// Output path of a route relative to the public dir
    pub fn output_path(&self, route: &str) -> PathBuf {
        self.blog.public_dir.join(route.trim_start_matches('/'))
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, contents).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::filter::tests::post;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_generate_writes_visible_routes() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_content_dir(dir.path(), None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let filter = PublishFilter::from_config(&blog.config, now, false);

        let posts = vec![
            post("live", false, Some(now - Duration::days(1))),
            post("draft", true, Some(now - Duration::days(1))),
            post("scheduled", false, Some(now + Duration::hours(2))),
        ];

        let generator = Generator::new(&blog);
        let summary = generator.generate(&posts, &filter).unwrap();
        assert_eq!(
            summary,
            GenerateSummary {
                markdown_routes: 1,
                feed_items: 1
            }
        );

        let md = fs::read_to_string(generator.output_path("/live/index.md")).unwrap();
        assert_eq!(md, "# live\n");
        assert!(!generator.output_path("/draft/index.md").exists());
        assert!(!generator.output_path("/scheduled/index.md").exists());

        let rss = fs::read_to_string(generator.output_path("/rss.xml")).unwrap();
        assert!(rss.contains("<link>https://blog.clueby4.dev/live/</link>"));
        assert!(!rss.contains("scheduled"));
    }

    #[test]
    fn test_regenerate_removes_unpublished_routes() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_content_dir(dir.path(), None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let filter = PublishFilter::from_config(&blog.config, now, false);
        let generator = Generator::new(&blog);

        let yesterday = Some(now - Duration::days(1));
        let mut posts = vec![post("live", false, yesterday), post("kept", false, yesterday)];
        generator.generate(&posts, &filter).unwrap();
        assert!(generator.output_path("/live/index.md").exists());

        // Extra files in a route directory survive the cleanup
        fs::write(generator.output_path("/live/cover.png"), b"png").unwrap();

        posts[0].data.draft = true;
        let summary = generator.generate(&posts, &filter).unwrap();
        assert_eq!(summary.markdown_routes, 1);
        assert!(!generator.output_path("/live/index.md").exists());
        assert!(generator.output_path("/live/cover.png").exists());
        assert!(generator.output_path("/kept/index.md").exists());

        posts[1].data.draft = true;
        generator.generate(&posts, &filter).unwrap();
        assert!(!generator.output_path("/kept").exists());
        assert!(generator.output_path("/rss.xml").exists());
    }

    #[test]
    fn test_unsafe_route_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let blog = Blog::with_content_dir(&root, None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let filter = PublishFilter::from_config(&blog.config, now, false);

        let posts = vec![post("../../escaped", false, Some(now - Duration::days(1)))];
        let summary = Generator::new(&blog).generate(&posts, &filter).unwrap();

        assert_eq!(summary.markdown_routes, 0);
        assert!(!dir.path().join("escaped").exists());
        assert!(!root.join("escaped").exists());
    }

    #[test]
    fn test_preview_includes_scheduled() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_content_dir(dir.path(), None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let filter = PublishFilter::from_config(&blog.config, now, true);

        let posts = vec![post("scheduled", false, Some(now + Duration::days(7)))];
        let generator = Generator::new(&blog);
        generator.generate(&posts, &filter).unwrap();

        assert!(generator.output_path("scheduled/index.md").exists());
    }
}
