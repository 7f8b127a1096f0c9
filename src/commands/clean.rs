//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Remove everything previously generated
pub fn run(blog: &Blog) -> Result<()> {
    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_content_dir(dir.path(), None).unwrap();
        fs::create_dir_all(blog.public_dir.join("post")).unwrap();
        fs::write(blog.public_dir.join("rss.xml"), "<rss/>").unwrap();

        run(&blog).unwrap();
        assert!(!blog.public_dir.exists());

        // Cleaning twice is fine
        run(&blog).unwrap();
    }
}
