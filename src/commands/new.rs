//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create a new post under `<source_dir>/<posts_base>/` and return its path
pub fn create_post(blog: &Blog, title: &str, categories: &[String]) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = blog.source_dir.join(&blog.config.posts_base);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let mut content = format!(
        "---\ntitle: {}\ndate: {}\n",
        yaml_string(title),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    match categories {
        [] => {}
        [single] => content.push_str(&format!("categories: {}\n", yaml_string(single))),
        many => {
            content.push_str("categories:\n");
            for category in many {
                content.push_str(&format!("  - {}\n", yaml_string(category)));
            }
        }
    }
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a scalar so titles like `Swift: Part 1` stay valid YAML
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_post(&blog, "Swift: \"Part\" 1", &["ios".to_string()]).unwrap();
        assert_eq!(path, blog.source_dir.join("posts/swift-part-1.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Swift: \"Part\" 1"));
        assert_eq!(fm.categories, vec!["ios"]);
        assert!(fm.parse_date().is_some());

        assert!(create_post(&blog, "Swift: \"Part\" 1", &[]).is_err());
    }
}
