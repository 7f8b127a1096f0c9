//! Helper functions shared by the generator, feeds and preview server

mod url;

pub use url::*;
