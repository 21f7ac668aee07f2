//! Data layer - queryable store of content nodes and their derived fields

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

use crate::content::{ContentNode, DerivedFields, NodeId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("node {node} has no field `{field}`")]
    MissingField { node: NodeId, field: &'static str },

    #[error("no markdown node with slug {slug:?}")]
    NotFound { slug: String },

    #[error("query failed: {0}")]
    Failed(String),
}

/// Ordering of the markdown listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Order in which nodes entered the store
    #[default]
    Insertion,
    DateAscending,
    DateDescending,
}

/// One row of the post listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: NodeId,
    pub title: String,
    pub date: DateTime<Local>,
    pub categories: Vec<String>,
    pub slug: String,
    pub excerpt: String,
}

/// A single post, as needed by the post template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub slug: String,
    pub title: String,
    pub date: DateTime<Local>,
    pub categories: Vec<String>,
    pub html: String,
}

/// Read access to markdown content
pub trait DataLayer {
    /// Every markdown node in the given order
    fn all_markdown(&self, order: SortOrder) -> Result<Vec<PostSummary>, QueryError>;

    /// The markdown node whose slug equals `slug`
    fn markdown_by_slug(&self, slug: &str) -> Result<PostDetail, QueryError>;
}

#[derive(Debug, Clone)]
struct Entry {
    node: ContentNode,
    fields: Option<DerivedFields>,
}

impl Entry {
    fn slug(&self) -> Result<&str, QueryError> {
        self.fields
            .as_ref()
            .map(|f| f.slug.as_str())
            .ok_or_else(|| QueryError::MissingField {
                node: self.node.id.clone(),
                field: "fields.slug",
            })
    }
}

/// In-memory node store, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    entries: Vec<Entry>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node together with the fields derived from it
    pub fn insert(&mut self, node: ContentNode, fields: Option<DerivedFields>) {
        self.entries.push(Entry { node, fields });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All stored nodes, markdown or not
    pub fn nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.entries.iter().map(|e| &e.node)
    }
}

impl DataLayer for ContentStore {
    fn all_markdown(&self, order: SortOrder) -> Result<Vec<PostSummary>, QueryError> {
        let mut rows = Vec::new();
        for entry in &self.entries {
            let Some(md) = entry.node.markdown() else {
                continue;
            };
            rows.push(PostSummary {
                id: entry.node.id.clone(),
                title: md.title(&entry.node.path).to_string(),
                date: md.date,
                categories: md.frontmatter.categories.clone(),
                slug: entry.slug()?.to_string(),
                excerpt: md.excerpt.clone(),
            });
        }

        // Stable sorts: equal dates keep insertion order
        match order {
            SortOrder::Insertion => {}
            SortOrder::DateAscending => rows.sort_by(|a, b| a.date.cmp(&b.date)),
            SortOrder::DateDescending => rows.sort_by(|a, b| b.date.cmp(&a.date)),
        }

        Ok(rows)
    }

    fn markdown_by_slug(&self, slug: &str) -> Result<PostDetail, QueryError> {
        for entry in &self.entries {
            let Some(md) = entry.node.markdown() else {
                continue;
            };
            if entry.slug()? == slug {
                return Ok(PostDetail {
                    slug: slug.to_string(),
                    title: md.title(&entry.node.path).to_string(),
                    date: md.date,
                    categories: md.frontmatter.categories.clone(),
                    html: md.html.clone(),
                });
            }
        }

        Err(QueryError::NotFound {
            slug: slug.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{derive_fields, fixtures};

    fn store(nodes: Vec<ContentNode>) -> ContentStore {
        let mut store = ContentStore::new();
        for node in nodes {
            let fields = derive_fields(&node, "posts").unwrap();
            store.insert(node, fields);
        }
        store
    }

    fn three_posts() -> ContentStore {
        store(vec![
            fixtures::post("jan.md", "January", (2020, 1, 1)),
            fixtures::post("mar.md", "March", (2020, 3, 1)),
            fixtures::post("feb.md", "February", (2020, 2, 1)),
            ContentNode::file_node("cover.png"),
        ])
    }

    fn titles(rows: &[PostSummary]) -> Vec<&str> {
        rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_date_descending_order() {
        let rows = three_posts().all_markdown(SortOrder::DateDescending).unwrap();
        assert_eq!(titles(&rows), vec!["March", "February", "January"]);
    }

    #[test]
    fn test_insertion_and_ascending_order() {
        let store = three_posts();
        let rows = store.all_markdown(SortOrder::Insertion).unwrap();
        assert_eq!(titles(&rows), vec!["January", "March", "February"]);

        let rows = store.all_markdown(SortOrder::DateAscending).unwrap();
        assert_eq!(titles(&rows), vec!["January", "February", "March"]);
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let store = store(vec![
            fixtures::post("first.md", "First", (2021, 5, 5)),
            fixtures::post("second.md", "Second", (2021, 5, 5)),
        ]);
        let rows = store.all_markdown(SortOrder::DateDescending).unwrap();
        assert_eq!(titles(&rows), vec!["First", "Second"]);
    }

    #[test]
    fn test_listing_excludes_files_and_exposes_fields() {
        let store = three_posts();
        assert_eq!(store.len(), 4);

        let rows = store.all_markdown(SortOrder::Insertion).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].slug, "/posts/jan/");
        assert_eq!(rows[0].excerpt, "About January");
        assert_eq!(rows[0].categories, vec!["swift"]);
    }

    #[test]
    fn test_missing_slug_is_a_query_error() {
        let mut store = ContentStore::new();
        store.insert(fixtures::post("a.md", "A", (2020, 1, 1)), None);

        let err = store.all_markdown(SortOrder::Insertion).unwrap_err();
        assert_eq!(
            err,
            QueryError::MissingField {
                node: NodeId::from_path(std::path::Path::new("a.md")),
                field: "fields.slug",
            }
        );
    }

    #[test]
    fn test_markdown_by_slug() {
        let store = three_posts();
        let post = store.markdown_by_slug("/posts/feb/").unwrap();
        assert_eq!(post.title, "February");
        assert_eq!(post.html, "<p>February</p>\n");

        assert_eq!(
            store.markdown_by_slug("/posts/nope/"),
            Err(QueryError::NotFound {
                slug: "/posts/nope/".to_string()
            })
        );
    }
}
