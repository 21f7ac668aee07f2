//! Slug derivation: file path in, canonical URL path out

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::path::{Component, Path};
use thiserror::Error;

use super::{ContentNode, DerivedFields, NodeKind};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Characters that would change the meaning of a URL path
const RESERVED: [char; 3] = ['?', '#', '%'];

/// Everything outside the RFC 3986 unreserved set is percent-encoded
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("path is empty")]
    Empty,

    #[error("path {0:?} is absolute")]
    Absolute(String),

    #[error("path {0:?} escapes the source directory")]
    ParentTraversal(String),

    #[error("path {0:?} is not valid UTF-8")]
    NonUtf8(String),

    #[error("path {0:?} has an empty file name")]
    EmptyName(String),

    #[error("path {path:?} contains reserved character {ch:?}")]
    ReservedCharacter { path: String, ch: char },
}

/// Compute the URL path for a source-relative file path.
///
/// ```ignore
/// create_file_path(Path::new("Hello World.md"), "posts")       // "/posts/hello-world/"
/// create_file_path(Path::new("posts/2020/intro.md"), "posts")  // "/posts/2020/intro/"
/// create_file_path(Path::new("swift/index.md"), "posts")       // "/posts/swift/"
/// ```
pub fn create_file_path(relative: &Path, base: &str) -> Result<String, SlugError> {
    let display = relative.to_string_lossy().to_string();

    let mut segments: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(os) => {
                let s = os
                    .to_str()
                    .ok_or_else(|| SlugError::NonUtf8(display.clone()))?;
                // Windows-style separators inside a component
                segments.extend(s.split('\\'));
            }
            Component::CurDir => {}
            Component::ParentDir => return Err(SlugError::ParentTraversal(display)),
            Component::RootDir | Component::Prefix(_) => {
                return Err(SlugError::Absolute(display));
            }
        }
    }
    segments.retain(|s| !s.trim().is_empty() && *s != ".");
    if segments.contains(&"..") {
        return Err(SlugError::ParentTraversal(display));
    }

    let file_name = segments.pop().ok_or(SlugError::Empty)?;
    if let Some(ch) = display.chars().find(|c| RESERVED.contains(c)) {
        return Err(SlugError::ReservedCharacter { path: display, ch });
    }

    let stem = match file_name.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => file_name,
    };
    if stem.trim().is_empty() {
        return Err(SlugError::EmptyName(display));
    }
    if !stem.eq_ignore_ascii_case("index") {
        segments.push(stem);
    }

    let base = normalize_segment(base.trim_matches('/'));
    if let Some(first) = segments.first() {
        if !base.is_empty() && normalize_segment(first) == base {
            segments.remove(0);
        }
    }

    let mut slug = String::from("/");
    for segment in std::iter::once(base.as_str())
        .chain(segments.iter().copied())
        .map(normalize_segment)
        .filter(|s| !s.is_empty())
    {
        slug.push_str(&segment);
        slug.push('/');
    }

    Ok(slug)
}

/// Lowercase a single path segment, collapse inner whitespace into `-` and
/// percent-encode whatever is left outside `[a-z0-9._~-]`
fn normalize_segment(segment: &str) -> String {
    let lowered = WHITESPACE
        .replace_all(segment.trim(), "-")
        .to_lowercase();
    utf8_percent_encode(&lowered, SEGMENT).to_string()
}

/// Derive the fields attached to a node.
///
/// Only markdown nodes get a slug; every other kind yields `Ok(None)`.
pub fn derive_fields(node: &ContentNode, base: &str) -> Result<Option<DerivedFields>, SlugError> {
    if node.kind() != NodeKind::Markdown {
        return Ok(None);
    }
    let slug = create_file_path(&node.path, base)?;
    Ok(Some(DerivedFields { slug }))
}
