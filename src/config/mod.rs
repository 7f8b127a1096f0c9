//! Configuration module

mod site;

pub use site::EditPostConfig;
pub use site::SiteConfig;
pub use site::TextDirection;
