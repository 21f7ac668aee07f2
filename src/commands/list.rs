//! List site content

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;

use crate::data::{DataLayer, SortOrder};
use crate::generator::Generator;
use crate::pages;
use crate::Blog;

#[derive(Serialize)]
struct NodeRow {
    id: String,
    kind: &'static str,
}

/// Print site content of the given type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    print!("{}", render(blog, content_type, json)?);
    Ok(())
}

/// Render the listing as text or JSON
pub fn render(blog: &Blog, content_type: &str, json: bool) -> Result<String> {
    let (store, rejected) = Generator::new(blog)?.load_store()?;
    for node in &rejected {
        tracing::warn!("Skipped {:?}: {}", node.path, node.reason);
    }

    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = store.all_markdown(SortOrder::DateDescending)?;
            if json {
                out = serde_json::to_string_pretty(&posts)?;
                out.push('\n');
            } else {
                writeln!(out, "Posts ({}):", posts.len())?;
                for post in &posts {
                    writeln!(
                        out,
                        "  {} - {} [{}]",
                        post.date.format("%Y-%m-%d"),
                        post.title,
                        post.slug
                    )?;
                }
            }
        }
        "page" | "pages" => {
            let bindings = pages::materialize(&store)?;
            if json {
                out = serde_json::to_string_pretty(&bindings)?;
                out.push('\n');
            } else {
                writeln!(out, "Pages ({}):", bindings.len())?;
                for binding in &bindings {
                    writeln!(out, "  {} ({})", binding.path, binding.template.file_name())?;
                }
            }
        }
        "category" | "categories" => {
            let posts = store.all_markdown(SortOrder::Insertion)?;
            let mut categories: IndexMap<String, usize> = IndexMap::new();
            for post in &posts {
                for cat in &post.categories {
                    *categories.entry(cat.clone()).or_insert(0) += 1;
                }
            }
            // Stable sort keeps first-seen order among equal counts
            categories.sort_by(|_, a, _, b| b.cmp(a));

            if json {
                out = serde_json::to_string_pretty(&categories)?;
                out.push('\n');
            } else {
                writeln!(out, "Categories ({}):", categories.len())?;
                for (cat, count) in &categories {
                    writeln!(out, "  {} ({})", cat, count)?;
                }
            }
        }
        "node" | "nodes" => {
            let nodes: Vec<NodeRow> = store
                .nodes()
                .map(|n| NodeRow {
                    id: n.id.to_string(),
                    kind: n.kind().as_str(),
                })
                .collect();
            if json {
                out = serde_json::to_string_pretty(&nodes)?;
                out.push('\n');
            } else {
                writeln!(out, "Nodes ({}):", nodes.len())?;
                for node in &nodes {
                    writeln!(out, "  {} [{}]", node.id, node.kind)?;
                }
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, page, category, node",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn blog_with_posts() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("src/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("first.md"),
            "---\ntitle: First\ndate: 2020-01-01\ncategories: [swift, ios]\n---\nBody\n",
        )
        .unwrap();
        fs::write(
            posts.join("second.md"),
            "---\ntitle: Second\ndate: 2020-02-01\ncategories: swift\n---\nBody\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_list_posts_newest_first() {
        let (_dir, blog) = blog_with_posts();
        let out = render(&blog, "posts", false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Posts (2):");
        assert_eq!(lines[1], "  2020-02-01 - Second [/posts/second/]");
        assert_eq!(lines[2], "  2020-01-01 - First [/posts/first/]");
    }

    #[test]
    fn test_list_categories_json() {
        let (_dir, blog) = blog_with_posts();
        let out = render(&blog, "categories", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["swift"], 2);
        assert_eq!(value["ios"], 1);
    }

    #[test]
    fn test_list_pages() {
        let (_dir, blog) = blog_with_posts();
        let out = render(&blog, "pages", false).unwrap();
        assert!(out.contains("  /posts/first/ (blog_post.html)"));
        assert!(out.contains("  /posts/second/ (blog_post.html)"));
    }

    #[test]
    fn test_list_unknown_type() {
        let (_dir, blog) = blog_with_posts();
        assert!(render(&blog, "tags", false).is_err());
    }
}
