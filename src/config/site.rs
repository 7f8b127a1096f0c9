//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub profile: String,
    pub og_image: String,
    pub lang: String,
    pub dir: TextDirection,
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Pagination
    pub post_per_index: usize,
    pub post_per_page: usize,

    /// Minutes before a post's date at which it already counts as published
    pub scheduled_post_margin: u32,

    // Features
    pub light_and_dark_mode: bool,
    pub show_archives: bool,
    pub show_back_button: bool,
    pub dynamic_og_image: bool,
    #[serde(default)]
    pub edit_post: EditPostConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Privileged Contexts".to_string(),
            description: "Personal technical blog focused on security, detection/response, and secure use of AI/agentic tooling.".to_string(),
            author: "Mike C".to_string(),
            profile: "https://blog.clueby4.dev/".to_string(),
            og_image: "og.png".to_string(),
            lang: "en".to_string(),
            dir: TextDirection::Ltr,
            timezone: "America/New_York".to_string(),

            url: "https://blog.clueby4.dev/".to_string(),

            content_dir: "BLOG".to_string(),
            public_dir: "public".to_string(),

            post_per_index: 6,
            post_per_page: 8,

            scheduled_post_margin: 15,

            light_and_dark_mode: true,
            show_archives: true,
            show_back_button: true,
            dynamic_og_image: false,
            edit_post: EditPostConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid site configuration in {:?}", path))?;
        config.tz()?;
        Ok(config)
    }

    /// The scheduling margin as a duration
    pub fn scheduled_margin(&self) -> Duration {
        Duration::minutes(i64::from(self.scheduled_post_margin))
    }

    /// Parse the configured IANA timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", self.timezone, e))
    }
}

/// Text direction of the rendered site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
    Auto,
}

/// "Edit this page" link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditPostConfig {
    pub enabled: bool,
    pub text: String,
    pub url: String,
}

impl Default for EditPostConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "Edit page".to_string(),
            url: String::new(),
        }
    }
}
