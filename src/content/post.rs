//! Post model

use std::path::{Path, PathBuf};

use super::schema::PostData;

/// A blog post loaded from the content directory
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Stable identifier derived from the file location
    pub id: String,

    /// Validated front-matter
    pub data: PostData,

    /// Raw markdown body (everything after the front-matter)
    pub body: String,

    /// Full source file path
    pub source: PathBuf,
}

impl Post {
    /// Create a post that was not read from disk
    pub fn new(id: impl Into<String>, data: PostData, body: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source: PathBuf::from(format!("{}.md", id)),
            id,
            data,
            body: body.into(),
        }
    }

    /// Derive a post id from its path relative to the content root.
    ///
    /// The extension is dropped and every segment slugified, so
    /// `Security/My Post.md` becomes `security/my-post`.
    pub fn id_from_path(relative: &Path) -> String {
        let without_ext = relative.with_extension("");
        without_ext
            .components()
            .map(|c| slug::slugify(c.as_os_str().to_string_lossy()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn slug(&self) -> &str {
        &self.data.slug
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_path() {
        assert_eq!(
            Post::id_from_path(Path::new("Security/My Post.md")),
            "security/my-post"
        );
        assert_eq!(
            Post::id_from_path(Path::new("ai/agent_sandboxing.md")),
            "ai/agent-sandboxing"
        );
    }
}
