//! Content module - discovery, markdown processing and slug derivation

mod frontmatter;
pub mod loader;
mod markdown;
mod node;
pub mod slug;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use node::{ContentNode, DerivedFields, MarkdownContent, NodeContent, NodeId, NodeKind};
pub use slug::{create_file_path, derive_fields, SlugError};

#[cfg(test)]
pub(crate) use node::fixtures;
