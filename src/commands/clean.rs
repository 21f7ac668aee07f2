//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::generator::staging_dir;
use crate::Blog;

/// Remove the public directory and any staging leftovers
pub fn run(blog: &Blog) -> Result<()> {
    let staging = staging_dir(&blog.public_dir);

    for dir in [&blog.public_dir, &staging] {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
            tracing::info!("Deleted: {:?}", dir);
        }
    }

    Ok(())
}
