//! Built-in site templates using the Tera template engine
//!
//! Every template is embedded in the binary. The views are pure: typed data
//! in, markup out.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

use crate::helpers::html_escape;
use crate::pages::Template;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered post bodies go out verbatim. Text fields use `escape`,
        // URLs and ids use `escape_attr`
        tera.autoescape_on(vec![]);
        tera.register_filter("escape_attr", escape_attr);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            (
                Template::Index.file_name(),
                include_str!("site/index.html"),
            ),
            (
                Template::BlogPost.file_name(),
                include_str!("site/blog_post.html"),
            ),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/profile_box.html",
                include_str!("site/partials/profile_box.html"),
            ),
        ])
        .context("Failed to load built-in templates")?;

        Ok(Self { tera })
    }

    /// Render the home page listing
    pub fn render_index(&self, site: &SiteData, index: &IndexData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", &index.posts);
        context.insert("profile", &index.profile);
        context.insert("show_categories", &index.show_categories);
        self.render(Template::Index, &context)
    }

    /// Render a single post
    pub fn render_post(&self, site: &SiteData, post: &PostPageData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        self.render(Template::BlogPost, &context)
    }

    fn render(&self, template: Template, context: &Context) -> Result<String> {
        self.tera
            .render(template.file_name(), context)
            .with_context(|| format!("Failed to render {}", template.file_name()))
    }
}

/// Attribute-safe escaping that keeps `/` intact. Missing links render empty.
fn escape_attr(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let escaped = match value {
        Value::Null => String::new(),
        Value::String(s) => html_escape(s),
        other => html_escape(&other.to_string()),
    };
    Ok(Value::String(escaped))
}

/// Data structures for template context

/// Site-wide values shared by every page (header, head)
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    /// Absolute URL of the home page
    pub url: String,
    pub home_url: String,
    pub typography_url: Option<String>,
    pub header_links: Vec<LinkData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkData {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub subtitle: String,
    pub menu: Vec<LinkData>,
}

/// One entry in the home page listing
#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub categories: Vec<String>,
    pub url: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub posts: Vec<PostListItem>,
    /// Profile box, rendered above the list when present
    pub profile: Option<ProfileData>,
    pub show_categories: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    /// Absolute URL of the post
    pub url: String,
    pub date: String,
    pub datetime: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "Big Apple Byte".to_string(),
            description: String::new(),
            url: "https://bigapplebyte.com/".to_string(),
            home_url: "/".to_string(),
            typography_url: Some("/css/typography.css".to_string()),
            header_links: vec![LinkData {
                name: "About".to_string(),
                url: Some("/about/".to_string()),
            }],
        }
    }

    fn item(title: &str, date: &str) -> PostListItem {
        PostListItem {
            id: format!("posts/{}.md", title.to_lowercase()),
            title: title.to_string(),
            date: date.to_string(),
            categories: vec!["swift".to_string(), "ios".to_string()],
            url: format!("/posts/{}/", title.to_lowercase()),
            excerpt: format!("All about {}", title),
        }
    }

    fn profile() -> ProfileData {
        ProfileData {
            name: "Jon Cravotta".to_string(),
            subtitle: "IOS Software Engineer | NYC".to_string(),
            menu: vec![
                LinkData {
                    name: "Work".to_string(),
                    url: None,
                },
                LinkData {
                    name: "About".to_string(),
                    url: Some("/about/".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_render_index_with_profile() {
        let renderer = TemplateRenderer::new().unwrap();
        let index = IndexData {
            posts: vec![item("March", "March 1"), item("January", "January 1")],
            profile: Some(profile()),
            show_categories: true,
        };
        let html = renderer.render_index(&site(), &index).unwrap();

        assert!(html.contains("<title>Big Apple Byte</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://bigapplebyte.com/">"#));
        assert!(html.contains(r#"href="/css/typography.css""#));
        assert!(html.contains(r#"<a href="/about/">About</a>"#));
        assert!(html.contains("<h1>Jon Cravotta</h1>"));
        assert!(html.contains("<a>Work</a>"));
        assert!(html.contains("March 1 | swift, ios"));
        assert!(html.contains(r#"href="/posts/march/""#));
        assert!(html.find("March").unwrap() < html.find("January").unwrap());
    }

    #[test]
    fn test_render_index_without_profile() {
        let renderer = TemplateRenderer::new().unwrap();
        let index = IndexData {
            posts: vec![item("March", "March 1")],
            profile: None,
            show_categories: false,
        };
        let html = renderer.render_index(&site(), &index).unwrap();

        assert!(!html.contains("profile-box"));
        assert!(!html.contains("swift"));
        assert!(html.contains("<h3>March</h3>"));
    }

    #[test]
    fn test_urls_and_ids_are_attribute_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut post = item("Quote", "March 1");
        post.id = r#"posts/say "hi".md"#.to_string();
        post.url = r#"/posts/say-"hi"/"#.to_string();
        let index = IndexData {
            posts: vec![post],
            profile: None,
            show_categories: false,
        };
        let html = renderer.render_index(&site(), &index).unwrap();

        assert!(html.contains(r#"id="posts/say &quot;hi&quot;.md""#));
        assert!(html.contains(r#"href="/posts/say-&quot;hi&quot;/""#));
        assert!(!html.contains(r#"say-"hi""#));
    }

    #[test]
    fn test_render_post() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = PostPageData {
            title: "Tips & Tricks".to_string(),
            url: "https://bigapplebyte.com/posts/tips/".to_string(),
            date: "March 1".to_string(),
            datetime: "2020-03-01T00:00:00+00:00".to_string(),
            html: "<p>Body <em>here</em></p>".to_string(),
        };
        let html = renderer.render_post(&site(), &post).unwrap();

        // Titles are escaped, bodies are emitted as rendered
        assert!(html.contains("<title>Tips &amp; Tricks | Big Apple Byte</title>"));
        assert!(html.contains("<p>Body <em>here</em></p>"));
        assert!(html.contains(r#"href="https://bigapplebyte.com/posts/tips/""#));
        assert!(!html.contains(r#"href="https://bigapplebyte.com/">"#));
        assert!(html.contains(r#"<time datetime="2020-03-01T00:00:00+00:00">March 1</time>"#));
    }
}
