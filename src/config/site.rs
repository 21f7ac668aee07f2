//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,
    /// Base segment every post slug starts with
    pub posts_base: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub static_dir: String,
    /// Glob patterns (relative to source_dir) skipped during discovery
    #[serde(default)]
    pub ignore: Vec<String>,

    // Styling
    /// Stylesheet holding the site typography, relative to the base directory
    pub typography: Option<String>,

    // Writing
    pub render_drafts: bool,
    pub excerpt_length: usize,
    pub excerpt_separator: Option<String>,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Date format (Moment.js style)
    pub date_format: String,

    // Views
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub header: HeaderConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Big Apple Byte".to_string(),
            description: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            posts_base: "posts".to_string(),

            source_dir: "src".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            ignore: Vec::new(),

            typography: None,

            render_drafts: false,
            excerpt_length: 140,
            excerpt_separator: None,
            highlight: HighlightConfig::default(),

            date_format: "MMMM D".to_string(),

            index: IndexConfig::default(),
            profile: ProfileConfig::default(),
            header: HeaderConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        if !config.extra.is_empty() {
            let mut keys: Vec<_> = config.extra.keys().collect();
            keys.sort();
            tracing::debug!("Unrecognized config keys: {:?}", keys);
        }

        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_numbers: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

/// Home page listing options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Render the profile box above the post list
    pub show_profile: bool,
    /// Render post categories next to the date
    pub show_categories: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            show_profile: true,
            show_categories: true,
        }
    }
}

/// A named link, used by the header and the profile menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl LinkConfig {
    fn new(name: &str, path: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            path: path.map(str::to_string),
        }
    }
}

/// Author profile shown on the home page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub subtitle: String,
    pub menu: Vec<LinkConfig>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Jon Cravotta".to_string(),
            subtitle: "IOS Software Engineer | NYC".to_string(),
            menu: vec![LinkConfig::new("Work", None), LinkConfig::new("About", None)],
        }
    }
}

/// Site header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub links: Vec<LinkConfig>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            links: vec![LinkConfig::new("About", Some("/about/"))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Big Apple Byte");
        assert_eq!(config.source_dir, "src");
        assert_eq!(config.posts_base, "posts");
        assert_eq!(config.excerpt_length, 140);
        assert!(config.index.show_profile);
        assert_eq!(config.header.links[0].path.as_deref(), Some("/about/"));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
source_dir: content
typography: src/utils/typography.css
index:
  show_profile: false
profile:
  name: Someone
  menu:
    - name: Work
      path: /work/
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.source_dir, "content");
        assert_eq!(
            config.typography.as_deref(),
            Some("src/utils/typography.css")
        );
        assert!(!config.index.show_profile);
        // Unset nested fields keep their defaults
        assert!(config.index.show_categories);
        assert_eq!(config.profile.name, "Someone");
        assert_eq!(config.profile.subtitle, "IOS Software Engineer | NYC");
        assert_eq!(config.profile.menu, vec![LinkConfig::new("Work", Some("/work/"))]);
        assert_eq!(config.posts_base, "posts");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SiteConfig::load(dir.path().join("_config.yml")).is_err());
    }
}
