//! Page materialization - one page binding per markdown node

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::data::{DataLayer, QueryError, SortOrder};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("page query failed: {0}")]
    Query(#[from] QueryError),

    #[error("two pages resolve to the same path {path:?}")]
    DuplicatePath { path: String },
}

/// Template a page is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    Index,
    BlogPost,
}

impl Template {
    /// Name of the registered template file
    pub fn file_name(&self) -> &'static str {
        match self {
            Template::Index => "index.html",
            Template::BlogPost => "blog_post.html",
        }
    }
}

/// Variables handed to a page's template query
pub type PageContext = IndexMap<String, serde_json::Value>;

/// A generated page: where it lives, how it renders, and with what context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageBinding {
    pub path: String,
    pub template: Template,
    pub context: PageContext,
}

impl PageBinding {
    /// Binding for a single post
    pub fn post(slug: &str) -> Self {
        let mut context = PageContext::new();
        context.insert("slug".to_string(), serde_json::Value::from(slug));
        Self {
            path: slug.to_string(),
            template: Template::BlogPost,
            context,
        }
    }

    /// Binding for the home page listing
    pub fn index() -> Self {
        Self {
            path: "/".to_string(),
            template: Template::Index,
            context: PageContext::new(),
        }
    }

    /// The `slug` context variable, if any
    pub fn slug(&self) -> Option<&str> {
        self.context.get("slug").and_then(|v| v.as_str())
    }
}

/// Produce one binding per markdown node, in insertion order
pub fn materialize<D: DataLayer + ?Sized>(data: &D) -> Result<Vec<PageBinding>, MaterializeError> {
    materialize_ordered(data, SortOrder::Insertion)
}

/// Produce one binding per markdown node, in the given order.
///
/// The query resolves fully before any binding is built; any failure yields
/// no bindings at all.
pub fn materialize_ordered<D: DataLayer + ?Sized>(
    data: &D,
    order: SortOrder,
) -> Result<Vec<PageBinding>, MaterializeError> {
    let rows = data.all_markdown(order)?;

    // The home page listing owns `/`
    let index = PageBinding::index();
    let mut seen = HashSet::with_capacity(rows.len() + 1);
    seen.insert(index.path.as_str());

    let mut bindings = Vec::with_capacity(rows.len());
    for row in &rows {
        if !seen.insert(row.slug.as_str()) {
            return Err(MaterializeError::DuplicatePath {
                path: row.slug.clone(),
            });
        }
        bindings.push(PageBinding::post(&row.slug));
    }

    tracing::debug!("Materialized {} post pages", bindings.len());
    Ok(bindings)
}
