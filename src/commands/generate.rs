//! Generate static routes

use anyhow::Result;
use chrono::Utc;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::PublishFilter;
use crate::generator::{GenerateSummary, Generator};
use crate::Blog;

/// Load the collection and write its public routes
pub fn run(blog: &Blog, preview: bool) -> Result<()> {
    run_at(blog, Utc::now(), preview).map(|_| ())
}

/// Generate as of a given instant
pub fn run_at(blog: &Blog, now: chrono::DateTime<Utc>, preview: bool) -> Result<GenerateSummary> {
    let start = std::time::Instant::now();

    let posts = blog.load_posts()?;
    let filter = PublishFilter::from_config(&blog.config, now, preview);
    if preview {
        tracing::info!("Preview mode: scheduled posts are included");
    }

    let summary = Generator::new(blog).generate(&posts, &filter)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} of {} posts in {:.2}s",
        summary.markdown_routes,
        posts.len(),
        duration.as_secs_f64()
    );

    Ok(summary)
}

/// Watch the content directory and `_config.yml`, regenerating once changes
/// settle. Config edits are picked up on the next rebuild.
pub fn watch(blog: &Blog, preview: bool) -> Result<()> {
    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&blog.content_dir, RecursiveMode::Recursive)?;

    let config_path = blog.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", blog.content_dir);

    let mut blog = blog.clone();
    for result in rx {
        match result {
            Ok(events) if !events.is_empty() => {
                tracing::info!("Content changed, regenerating...");
                blog = rebuild(&blog, preview);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Reload the site config and regenerate. Returns the blog to use next time,
/// which is the previous one if the config could not be read.
fn rebuild(blog: &Blog, preview: bool) -> Blog {
    let next = match blog.reload() {
        Ok(next) => {
            if next.content_dir != blog.content_dir {
                tracing::warn!(
                    "Content directory is now {:?}; restart to watch it",
                    next.content_dir
                );
            }
            next
        }
        Err(e) => {
            tracing::error!("Failed to reload _config.yml, keeping previous settings: {:#}", e);
            blog.clone()
        }
    };

    if let Err(e) = run(&next, preview) {
        tracing::error!("Generation failed: {:#}", e);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    #[test]
    fn test_run_at_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let posts_dir = root.join("BLOG").join("security");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("live.md"),
            "---\ntitle: Live\nslug: live\ndraft: false\ndate: 2024-01-01\n---\nLive body\n",
        )
        .unwrap();
        fs::write(
            posts_dir.join("wip.md"),
            "---\ntitle: WIP\nslug: wip\ndate: 2024-01-01\n---\nNot yet\n",
        )
        .unwrap();
        fs::write(posts_dir.join("Untitled.md"), "scratch").unwrap();

        let blog = Blog::with_content_dir(root, None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let summary = run_at(&blog, now, false).unwrap();

        assert_eq!(summary.markdown_routes, 1);
        assert_eq!(summary.feed_items, 1);
        assert_eq!(
            fs::read_to_string(root.join("public/live/index.md")).unwrap(),
            "Live body\n"
        );
        assert!(!root.join("public/wip").exists());
    }

    #[test]
    fn test_unpublished_post_route_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let posts_dir = root.join("BLOG").join("cloud");
        fs::create_dir_all(&posts_dir).unwrap();
        let source = posts_dir.join("iam.md");
        fs::write(
            &source,
            "---\ntitle: IAM\nslug: iam\ndraft: false\ndate: 2024-01-01\n---\nBody\n",
        )
        .unwrap();

        let blog = Blog::with_content_dir(root, None).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        run_at(&blog, now, false).unwrap();
        assert!(root.join("public/iam/index.md").exists());

        fs::write(
            &source,
            "---\ntitle: IAM\nslug: iam\ndraft: true\ndate: 2024-01-01\n---\nBody\n",
        )
        .unwrap();
        let summary = run_at(&blog, now, false).unwrap();
        assert_eq!(summary.markdown_routes, 0);
        assert!(!root.join("public/iam").exists());
        let rss = fs::read_to_string(root.join("public/rss.xml")).unwrap();
        assert!(!rss.contains("/iam/"));
    }

    #[test]
    fn test_rebuild_applies_config_edits() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("BLOG")).unwrap();
        let blog = Blog::with_content_dir(root, None).unwrap();
        blog.generate(false).unwrap();
        assert!(root.join("public/rss.xml").exists());

        fs::write(root.join("_config.yml"), "public_dir: dist\n").unwrap();
        let next = rebuild(&blog, false);
        assert_eq!(next.public_dir, root.join("dist"));
        assert!(root.join("dist/rss.xml").exists());

        // A broken config keeps the last good settings
        fs::write(root.join("_config.yml"), "public_dir: [oops\n").unwrap();
        let kept = rebuild(&next, false);
        assert_eq!(kept.public_dir, root.join("dist"));
    }

    #[test]
    fn test_run_at_fails_on_malformed_post() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let posts_dir = root.join("BLOG").join("ai");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("bad.md"),
            "---\ntitle: Bad\nslug: bad\ncanonical: not a url\n---\n",
        )
        .unwrap();

        let blog = Blog::with_content_dir(root, None).unwrap();
        let err = run_at(&blog, Utc::now(), false).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("bad.md"));
        assert!(msg.contains("canonical"));
    }
}
