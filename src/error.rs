//! Structured error types for content loading and route lookup.
//!
//! Library operations return these; the CLI wraps them in `anyhow`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A front-matter field failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Required field absent, null, or blank
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// Field present but of the wrong shape
    #[error("invalid value for '{field}': {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl SchemaError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// No visible post is published under the requested slug
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no published post with slug '{slug}'")]
pub struct NotFoundError {
    pub slug: String,
}

/// Loading the content collection failed
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("malformed front-matter in {path:?}: {reason}")]
    FrontMatter { path: PathBuf, reason: String },

    #[error("{path:?}: {source}")]
    Schema { path: PathBuf, source: SchemaError },
}

impl LoadError {
    /// The file that failed to load, when known
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::FrontMatter { path, .. } | Self::Schema { path, .. } => {
                Some(path)
            }
            Self::Pattern(_) => None,
        }
    }
}
