//! RSS 2.0 feed of the visible collection

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::SiteConfig;
use crate::content::{Post, PublishFilter};
use crate::helpers::{full_url_for, resolve_path};

/// Language tag written into every feed
pub const FEED_LANGUAGE: &str = "en-us";

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// One `<item>` of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    /// Site-relative link, e.g. `/my-slug/`
    pub link: String,
    pub pub_date: DateTime<Utc>,
}

/// Visible posts as feed items, newest first.
///
/// Posts without a date sort as the Unix epoch. Equal dates are ordered by
/// slug so the output does not depend on discovery order.
pub fn project(posts: &[Post], filter: &PublishFilter) -> Vec<FeedItem> {
    let mut visible = filter.visible(posts);
    visible.sort_by(|a, b| {
        pub_date(b)
            .cmp(&pub_date(a))
            .then_with(|| a.data.slug.cmp(&b.data.slug))
    });

    visible
        .into_iter()
        .map(|post| FeedItem {
            title: post.data.title.clone(),
            description: post.data.description.clone().unwrap_or_default(),
            link: resolve_path(post),
            pub_date: pub_date(post),
        })
        .collect()
}

fn pub_date(post: &Post) -> DateTime<Utc> {
    post.data.date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Channel metadata of the feed
pub struct RssChannel<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Absolute site URL that item links are resolved against
    pub site: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self {
            title: &config.title,
            description: &config.description,
            site: &config.url,
        }
    }

    pub fn render(&self, items: &[FeedItem]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.title)?;
        push_text(&mut writer, "description", self.description)?;
        push_text(&mut writer, "link", &full_url_for(self.site, ""))?;
        push_text(&mut writer, "language", FEED_LANGUAGE)?;

        for item in items {
            let link = full_url_for(self.site, &item.link);

            writer.write_event(Event::Start(BytesStart::new("item")))?;
            push_text(&mut writer, "title", &item.title)?;
            push_text(&mut writer, "link", &link)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_text(&mut writer, "description", &item.description)?;
            push_text(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;
            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
