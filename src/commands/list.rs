//! List site content

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::content::{Post, PublishFilter};
use crate::feed::MarkdownExport;
use crate::helpers::resolve_path;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, preview: bool) -> Result<()> {
    let posts = blog.load_posts()?;
    let filter = PublishFilter::from_config(&blog.config, Utc::now(), preview);

    let lines = match content_type {
        "post" | "posts" => post_lines(&posts, &filter),
        "tag" | "tags" => tag_lines(&posts),
        "route" | "routes" => route_lines(&posts, &filter),
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, route",
                content_type
            );
        }
    };

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

fn post_lines(posts: &[Post], filter: &PublishFilter) -> Vec<String> {
    let mut lines = vec![format!("Posts ({}):", posts.len())];
    for post in posts {
        lines.push(format!(
            "  {} {} - {} {} [{}]",
            status(post, filter),
            format_date(post.data.date),
            post.data.title,
            resolve_path(post),
            post.id
        ));
    }
    lines
}

fn status(post: &Post, filter: &PublishFilter) -> &'static str {
    if post.data.draft {
        "draft    "
    } else if post.data.date.is_none() {
        "undated  "
    } else if filter.is_visible(post) {
        "live     "
    } else {
        "scheduled"
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "----------       ".to_string())
}

fn tag_lines(posts: &[Post]) -> Vec<String> {
    let mut tags: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.data.tags {
            *tags.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<_> = tags.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut lines = vec![format!("Tags ({}):", tags.len())];
    lines.extend(tags.into_iter().map(|(tag, count)| format!("  {} ({})", tag, count)));
    lines
}

fn route_lines(posts: &[Post], filter: &PublishFilter) -> Vec<String> {
    let export = MarkdownExport::new(posts, filter);
    let mut lines = vec![format!("Routes ({}):", export.len() + 1)];
    lines.push("  /rss.xml".to_string());
    lines.extend(export.routes().into_iter().map(|r| format!("  {}", r)));
    lines
}
