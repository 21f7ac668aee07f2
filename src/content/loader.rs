//! Content loader - discovers source files and turns them into nodes

use anyhow::{Context, Result};
use chrono::Local;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{ContentNode, FrontMatter, MarkdownContent, MarkdownRenderer, NodeContent, NodeId};
use crate::Blog;

/// Walks the source directory and emits one node per file
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    ignore: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let renderer = MarkdownRenderer::with_options(&blog.config.highlight);
        let ignore = blog
            .config
            .ignore
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            blog,
            renderer,
            ignore,
        })
    }

    /// Discover every file under the source directory.
    ///
    /// Entries are visited in file-name order so node order is the same
    /// from one build to the next.
    pub fn discover(&self) -> Result<Vec<ContentNode>> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            tracing::warn!("Source directory {:?} does not exist", source_dir);
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();
        let walker = WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", source_dir))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(source_dir).unwrap_or(path).to_path_buf();
            if self.is_ignored(&relative) {
                tracing::debug!("Ignored: {:?}", relative);
                continue;
            }

            if is_markdown_file(path) {
                let content = self
                    .load_markdown(path)
                    .with_context(|| format!("Failed to load {:?}", path))?;
                if !content.frontmatter.published && !self.blog.config.render_drafts {
                    tracing::debug!("Skipping unpublished post {:?}", relative);
                    continue;
                }
                nodes.push(self.node(relative, path, NodeContent::Markdown(Box::new(content))));
            } else {
                nodes.push(self.node(relative, path, NodeContent::File));
            }
        }

        tracing::debug!("Discovered {} nodes in {:?}", nodes.len(), source_dir);
        Ok(nodes)
    }

    fn node(&self, relative: PathBuf, absolute: &Path, content: NodeContent) -> ContentNode {
        ContentNode {
            id: NodeId::from_path(&relative),
            path: relative,
            absolute_path: absolute.to_path_buf(),
            content,
        }
    }

    fn is_ignored(&self, relative: &Path) -> bool {
        self.ignore.iter().any(|p| p.matches_path(relative))
    }

    /// Parse and render a single markdown file
    fn load_markdown(&self, path: &Path) -> Result<MarkdownContent> {
        let content = fs::read_to_string(path)?;
        let (frontmatter, body) = FrontMatter::parse(&content)?;

        let date = match frontmatter.parse_date() {
            Some(date) => date,
            None => {
                if let Some(raw) = &frontmatter.date {
                    tracing::warn!("Unrecognized date {:?} in {:?}, using mtime", raw, path);
                }
                fs::metadata(path)?
                    .modified()
                    .map(chrono::DateTime::<Local>::from)
                    .unwrap_or_else(|_| Local::now())
            }
        };

        let html = self.renderer.render(body)?;
        let excerpt = MarkdownRenderer::excerpt(
            body,
            self.blog.config.excerpt_length,
            self.blog.config.excerpt_separator.as_deref(),
        );

        Ok(MarkdownContent {
            frontmatter,
            date,
            excerpt,
            html,
            raw: body.to_string(),
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NodeKind;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_discover_emits_one_node_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write(&src, "posts/b.md", "---\ntitle: B\ndate: 2020-02-01\n---\nBee.");
        write(&src, "posts/a.md", "---\ntitle: A\ndate: 2020-01-01\n---\nAy.");
        write(&src, "images/cat.png", "png");
        write(&src, ".cache/junk.md", "hidden");

        let blog = Blog::new(dir.path()).unwrap();
        let nodes = ContentLoader::new(&blog).unwrap().discover().unwrap();

        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["images/cat.png", "posts/a.md", "posts/b.md"]);
        assert_eq!(nodes[0].kind(), NodeKind::File);

        let a = nodes[1].markdown().unwrap();
        assert_eq!(a.frontmatter.title.as_deref(), Some("A"));
        assert_eq!(a.date.format("%Y-%m-%d").to_string(), "2020-01-01");
        assert_eq!(a.excerpt, "Ay.");
        assert!(a.html.contains("<p>Ay.</p>"));
    }

    #[test]
    fn test_drafts_and_ignored_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write(&src, "posts/live.md", "---\ntitle: Live\n---\n");
        write(&src, "posts/draft.md", "---\ntitle: Draft\npublished: false\n---\n");
        write(&src, "components/header.js", "export default 1");
        fs::write(
            dir.path().join("_config.yml"),
            "ignore:\n  - \"components/**\"\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let nodes = ContentLoader::new(&blog).unwrap().discover().unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["posts/live.md"]);
    }

    #[test]
    fn test_bad_frontmatter_fails_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("src"),
            "posts/broken.md",
            "---\ntitle: [oops\n---\n",
        );
        let blog = Blog::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&blog).unwrap().discover().is_err());
    }

    #[test]
    fn test_missing_source_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&blog).unwrap().discover().unwrap().is_empty());
    }
}
