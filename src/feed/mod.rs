//! Feed projection - the public representations of the visible collection

pub mod markdown;
pub mod rss;

pub use markdown::{MarkdownExport, MarkdownResponse, MARKDOWN_CONTENT_TYPE};
pub use rss::{FeedItem, RssChannel, FEED_LANGUAGE, RSS_CONTENT_TYPE};

use crate::config::SiteConfig;
use crate::content::{Post, PublishFilter};

/// Render the site's RSS document for the given collection
pub fn render_rss(
    config: &SiteConfig,
    posts: &[Post],
    filter: &PublishFilter,
) -> quick_xml::Result<Vec<u8>> {
    let items = rss::project(posts, filter);
    RssChannel::from_config(config).render(&items)
}
