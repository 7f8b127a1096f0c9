//! Publish filter: decides which posts are public at a given instant

use chrono::{DateTime, Duration, Utc};

use super::Post;
use crate::config::SiteConfig;

/// Whether `post` is publicly visible at `now`.
///
/// Drafts and undated posts are never visible. Otherwise the post is live
/// once `now` passes its date minus `scheduled_margin`. A date too early to
/// subtract the margin from is already live. Preview mode skips the schedule
/// check but not the draft check.
pub fn is_visible(post: &Post, now: DateTime<Utc>, scheduled_margin: Duration, preview: bool) -> bool {
    if post.data.draft {
        return false;
    }
    let Some(date) = post.data.date else {
        return false;
    };
    preview
        || date
            .checked_sub_signed(scheduled_margin)
            .map_or(true, |live_at| now > live_at)
}

/// Inputs of the publish filter for one build or preview run
#[derive(Debug, Clone, Copy)]
pub struct PublishFilter {
    pub now: DateTime<Utc>,
    pub scheduled_margin: Duration,
    pub preview: bool,
}

impl PublishFilter {
    pub fn new(now: DateTime<Utc>, scheduled_margin: Duration, preview: bool) -> Self {
        Self {
            now,
            scheduled_margin,
            preview,
        }
    }

    /// Filter using the site's configured margin
    pub fn from_config(config: &SiteConfig, now: DateTime<Utc>, preview: bool) -> Self {
        Self::new(now, config.scheduled_margin(), preview)
    }

    pub fn is_visible(&self, post: &Post) -> bool {
        is_visible(post, self.now, self.scheduled_margin, self.preview)
    }

    /// Visible posts, in collection order
    pub fn visible<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.is_visible(p)).collect()
    }
}
