//! Content module - posts, front-matter validation and publish filtering

pub mod filter;
mod frontmatter;
pub mod loader;
mod post;
pub mod schema;

pub use filter::{is_visible, PublishFilter};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use post::Post;
pub use schema::{PostData, ValidateOptions};
