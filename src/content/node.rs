//! Content nodes produced by discovery

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::FrontMatter;

/// Stable node identifier: the source-relative path with forward slashes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn from_path(relative: &Path) -> Self {
        Self(relative.to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal type tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// A markdown post with front-matter
    Markdown,
    /// Any other file under the source directory
    File,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Markdown => "Markdown",
            NodeKind::File => "File",
        }
    }
}

/// Parsed and rendered markdown of a post
#[derive(Debug, Clone)]
pub struct MarkdownContent {
    pub frontmatter: FrontMatter,
    /// Front-matter date, or the file's modification time when absent
    pub date: DateTime<Local>,
    /// Plain-text excerpt
    pub excerpt: String,
    /// Rendered HTML body
    pub html: String,
    /// Markdown body without front-matter
    pub raw: String,
}

impl MarkdownContent {
    /// Title from front-matter, falling back to the file name
    pub fn title<'a>(&'a self, path: &'a Path) -> &'a str {
        self.frontmatter
            .title
            .as_deref()
            .or_else(|| path.file_stem().and_then(|s| s.to_str()))
            .unwrap_or("Untitled")
    }
}

#[derive(Debug, Clone)]
pub enum NodeContent {
    Markdown(Box<MarkdownContent>),
    File,
}

/// One discovered source file
#[derive(Debug, Clone)]
pub struct ContentNode {
    pub id: NodeId,
    /// Path relative to the source directory
    pub path: PathBuf,
    pub absolute_path: PathBuf,
    pub content: NodeContent,
}

impl ContentNode {
    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Markdown(_) => NodeKind::Markdown,
            NodeContent::File => NodeKind::File,
        }
    }

    pub fn markdown(&self) -> Option<&MarkdownContent> {
        match &self.content {
            NodeContent::Markdown(md) => Some(&**md),
            NodeContent::File => None,
        }
    }

    /// Build a markdown node without touching the filesystem
    pub fn markdown_node(relative: impl Into<PathBuf>, content: MarkdownContent) -> Self {
        let path = relative.into();
        Self {
            id: NodeId::from_path(&path),
            absolute_path: path.clone(),
            path,
            content: NodeContent::Markdown(Box::new(content)),
        }
    }

    /// Build a plain file node without touching the filesystem
    pub fn file_node(relative: impl Into<PathBuf>) -> Self {
        let path = relative.into();
        Self {
            id: NodeId::from_path(&path),
            absolute_path: path.clone(),
            path,
            content: NodeContent::File,
        }
    }
}

/// Fields derived from a node after discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    pub slug: String,
}
