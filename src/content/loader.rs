//! Content loader - discovers and validates posts under the content directory
//!
//! Loading runs in two explicit phases: [`ContentLoader::discover`] lists
//! matching files eagerly, then [`ContentLoader::load_posts`] parses and
//! validates each one. The first malformed file aborts the load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::{self, ValidateOptions};
use super::{FrontMatter, Post};
use crate::error::LoadError;
use crate::Blog;

/// Posts live exactly one directory below the content root
const POST_PATTERN: &str = "*/*.md";

/// Files whose name starts with this are editor scratch files
const EXCLUDED_PREFIX: &str = "Untitled";

/// Loads posts from the content directory
pub struct ContentLoader {
    content_dir: PathBuf,
    options: ValidateOptions,
}

impl ContentLoader {
    /// Create a loader for an arbitrary directory
    pub fn new<P: AsRef<Path>>(content_dir: P, options: ValidateOptions) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            options,
        }
    }

    /// Create a loader for a blog's configured content directory
    pub fn for_blog(blog: &Blog) -> anyhow::Result<Self> {
        let options = ValidateOptions {
            timezone: blog.config.tz()?,
        };
        Ok(Self::new(&blog.content_dir, options))
    }

    /// Find all post files, sorted by path
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let base = glob::Pattern::escape(&self.content_dir.to_string_lossy());
        let pattern = format!("{}/{}", base.trim_end_matches('/'), POST_PATTERN);

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| LoadError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if path.is_file() && !is_excluded(&path) {
                files.push(path);
            }
        }
        files.sort();

        tracing::debug!("Discovered {} post files in {:?}", files.len(), self.content_dir);
        Ok(files)
    }

    /// Load and validate every discovered post
    pub fn load_posts(&self) -> Result<Vec<Post>, LoadError> {
        let files = self.discover()?;
        let mut posts = Vec::with_capacity(files.len());
        let mut seen_slugs: HashMap<String, PathBuf> = HashMap::new();

        for path in files {
            let post = self.load_post(&path)?;
            if let Some(previous) = seen_slugs.insert(post.data.slug.clone(), path.clone()) {
                tracing::warn!(
                    "Slug {:?} is used by both {:?} and {:?}",
                    post.data.slug,
                    previous,
                    path
                );
            }
            posts.push(post);
        }

        tracing::info!("Loaded {} posts from {:?}", posts.len(), self.content_dir);
        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (fm, body) = FrontMatter::parse(&content).map_err(|reason| LoadError::FrontMatter {
            path: path.to_path_buf(),
            reason,
        })?;

        let data = schema::validate(&fm.data, &self.options).map_err(|source| LoadError::Schema {
            path: path.to_path_buf(),
            source,
        })?;

        let relative = path.strip_prefix(&self.content_dir).unwrap_or(path);

        Ok(Post {
            id: Post::id_from_path(relative),
            data,
            body: body.to_string(),
            source: path.to_path_buf(),
        })
    }
}

fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(EXCLUDED_PREFIX))
        .unwrap_or(false)
}
