//! privileged-contexts: the content pipeline behind the Privileged Contexts blog
//!
//! Posts are Markdown files with YAML front-matter. They are validated into
//! a plain collection, gated by a draft/schedule publish filter, and projected
//! into raw Markdown routes (`/<slug>/index.md`) and an RSS feed (`/rss.xml`).

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod server;

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that points the loader at another content directory
pub const CONTENT_DIR_ENV: &str = "CONTENT_DIR";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory holding `<category>/<post>.md`
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Content directory given explicitly instead of through `_config.yml`
    content_override: Option<PathBuf>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    ///
    /// A relative `CONTENT_DIR` is taken from the process working directory,
    /// not from `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
        let content_override = content_dir_from_env(std::env::var_os(CONTENT_DIR_ENV), &cwd);
        Self::with_content_dir(base_dir, content_override)
    }

    /// Create a Blog instance, optionally overriding the content directory.
    /// A relative override is joined onto `base_dir`.
    pub fn with_content_dir<P: AsRef<Path>>(
        base_dir: P,
        content_override: Option<PathBuf>,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = match &content_override {
            Some(dir) => {
                tracing::debug!("Using content directory override: {:?}", dir);
                base_dir.join(dir)
            }
            None => base_dir.join(&config.content_dir),
        };
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            content_override,
        })
    }

    /// Re-read `_config.yml`, keeping any content directory override
    pub fn reload(&self) -> Result<Self> {
        Self::with_content_dir(&self.base_dir, self.content_override.clone())
    }

    /// Load and validate all posts
    pub fn load_posts(&self) -> Result<Vec<content::Post>> {
        let loader = content::ContentLoader::for_blog(self)?;
        Ok(loader.load_posts()?)
    }

    /// Generate the static routes
    pub fn generate(&self, preview: bool) -> Result<()> {
        commands::generate::run(self, preview)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

/// Content directory named by the environment, made absolute against `cwd`
fn content_dir_from_env(value: Option<OsString>, cwd: &Path) -> Option<PathBuf> {
    let dir = PathBuf::from(value.filter(|v| !v.is_empty())?);
    Some(if dir.is_relative() { cwd.join(dir) } else { dir })
}
