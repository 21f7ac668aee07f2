//! Generator module - runs the build pipeline and publishes the site
//!
//! Discovery, slug derivation and page materialization happen first, then
//! every page is rendered in memory. Output is written to a staging directory
//! which replaces the public directory only once everything succeeded, so a
//! failed build leaves the previous site in place.

use anyhow::{bail, Context, Result};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::loader::ContentLoader;
use crate::content::{derive_fields, ContentNode};
use crate::data::{ContentStore, DataLayer, PostSummary, SortOrder};
use crate::helpers::{date_xml, format_date, full_url_for, url_for};
use crate::pages::{self, PageBinding, Template};
use crate::templates::{
    IndexData, LinkData, PostListItem, PostPageData, ProfileData, SiteData, TemplateRenderer,
};
use crate::Blog;

/// Where the typography stylesheet lands inside the output
const TYPOGRAPHY_OUTPUT: &str = "css/typography.css";

/// A node that got no page because its slug could not be derived
#[derive(Debug, Clone, Serialize)]
pub struct RejectedNode {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a finished build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Post pages written
    pub posts: usize,
    /// Static files copied
    pub assets: usize,
    pub rejected: Vec<RejectedNode>,
}

/// A page rendered in memory, waiting to be written
struct RenderedPage {
    path: String,
    html: String,
}

/// Static site generator using the built-in templates
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Result<Self> {
        Ok(Self {
            blog,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Discover content and load it into a queryable store.
    ///
    /// Nodes whose slug cannot be derived are left out of the store and
    /// reported instead.
    pub fn load_store(&self) -> Result<(ContentStore, Vec<RejectedNode>)> {
        let nodes = ContentLoader::new(self.blog)?.discover()?;
        Ok(build_store(nodes, &self.blog.config.posts_base))
    }

    /// Run the whole pipeline and publish the result
    pub fn build(&self) -> Result<BuildReport> {
        let (store, rejected) = self.load_store()?;
        let bindings = pages::materialize(&store)?;

        let rendered = self.render_pages(&store, &bindings)?;

        let staging = staging_dir(&self.blog.public_dir);
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Failed to clear {:?}", staging))?;
        }

        let written = self
            .write_site(&staging, &rendered)
            .and_then(|()| self.copy_assets(&staging));
        let assets = match written {
            Ok(assets) => assets,
            Err(e) => {
                // Leave the published site alone
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };

        publish(&staging, &self.blog.public_dir)?;

        Ok(BuildReport {
            posts: bindings.len(),
            assets,
            rejected,
        })
    }

    /// Render the index plus one page per binding
    fn render_pages<D: DataLayer + ?Sized>(
        &self,
        data: &D,
        bindings: &[PageBinding],
    ) -> Result<Vec<RenderedPage>> {
        let config = &self.blog.config;
        let site = self.site_data();
        let mut rendered = Vec::with_capacity(bindings.len() + 1);

        let listing = data.all_markdown(SortOrder::DateDescending)?;
        rendered.push(RenderedPage {
            path: PageBinding::index().path,
            html: self.renderer.render_index(&site, &self.index_data(&listing))?,
        });

        for binding in bindings {
            match binding.template {
                Template::BlogPost => {
                    let slug = binding
                        .slug()
                        .with_context(|| format!("Page {} has no slug", binding.path))?;
                    let post = data.markdown_by_slug(slug)?;
                    let page = PostPageData {
                        url: full_url_for(&config.url, &config.root, &post.slug),
                        title: post.title,
                        date: format_date(&post.date, &config.date_format),
                        datetime: date_xml(&post.date),
                        html: post.html,
                    };
                    rendered.push(RenderedPage {
                        path: binding.path.clone(),
                        html: self.renderer.render_post(&site, &page)?,
                    });
                }
                Template::Index => bail!("Unexpected index binding at {}", binding.path),
            }
        }

        Ok(rendered)
    }

    /// Values shared by every page
    fn site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            url: full_url_for(&config.url, &config.root, "/"),
            home_url: url_for(&config.root, "/"),
            typography_url: config
                .typography
                .as_ref()
                .map(|_| url_for(&config.root, TYPOGRAPHY_OUTPUT)),
            header_links: self.links(&config.header.links),
        }
    }

    fn links(&self, links: &[crate::config::LinkConfig]) -> Vec<LinkData> {
        links
            .iter()
            .map(|l| LinkData {
                name: l.name.clone(),
                url: l.path.as_deref().map(|p| url_for(&self.blog.config.root, p)),
            })
            .collect()
    }

    fn index_data(&self, listing: &[PostSummary]) -> IndexData {
        let config = &self.blog.config;
        let posts = listing
            .iter()
            .map(|p| PostListItem {
                id: p.id.to_string(),
                title: p.title.clone(),
                date: format_date(&p.date, &config.date_format),
                categories: p.categories.clone(),
                url: url_for(&config.root, &p.slug),
                excerpt: p.excerpt.clone(),
            })
            .collect();

        let profile = config.index.show_profile.then(|| ProfileData {
            name: config.profile.name.clone(),
            subtitle: config.profile.subtitle.clone(),
            menu: self.links(&config.profile.menu),
        });

        IndexData {
            posts,
            profile,
            show_categories: config.index.show_categories,
        }
    }

    /// Write every rendered page as `<path>/index.html` under `root`.
    ///
    /// Page paths are percent-encoded URLs; the directories use the decoded
    /// names so static hosts resolve them.
    fn write_site(&self, root: &Path, pages: &[RenderedPage]) -> Result<()> {
        for page in pages {
            let relative = percent_decode_str(page.path.trim_start_matches('/'))
                .decode_utf8()
                .with_context(|| format!("Page path {} is not valid UTF-8", page.path))?;
            let output_path = root.join(relative.as_ref()).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create dir {:?}", parent))?;
            }
            fs::write(&output_path, &page.html)
                .with_context(|| format!("Failed to write {:?}", output_path))?;
            tracing::debug!("Generated: {:?}", output_path);
        }
        Ok(())
    }

    /// Copy the static directory and the typography stylesheet
    fn copy_assets(&self, root: &Path) -> Result<usize> {
        let mut copied = 0;

        let static_dir = &self.blog.static_dir;
        if static_dir.exists() {
            for entry in WalkDir::new(static_dir).follow_links(true) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(static_dir)?;
                copy_file(entry.path(), &root.join(relative))?;
                copied += 1;
            }
        }

        if let Some(typography) = &self.blog.config.typography {
            let source = self.blog.base_dir.join(typography);
            if !source.is_file() {
                bail!("Typography stylesheet {:?} not found", source);
            }
            copy_file(&source, &root.join(TYPOGRAPHY_OUTPUT))?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Derive fields for every node and collect them into a store
pub fn build_store(nodes: Vec<ContentNode>, base: &str) -> (ContentStore, Vec<RejectedNode>) {
    let mut store = ContentStore::new();
    let mut rejected = Vec::new();

    for node in nodes {
        match derive_fields(&node, base) {
            Ok(fields) => store.insert(node, fields),
            Err(e) => {
                tracing::error!("No page for {:?}: {}", node.path, e);
                rejected.push(RejectedNode {
                    path: node.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    (store, rejected)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    Ok(())
}

/// Sibling directory the next build is written into
pub(crate) fn staging_dir(public_dir: &Path) -> PathBuf {
    let name = public_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "public".to_string());
    public_dir.with_file_name(format!("{}.staging", name))
}

/// Swap the staging directory in as the public directory
fn publish(staging: &Path, public_dir: &Path) -> Result<()> {
    if public_dir.exists() {
        fs::remove_dir_all(public_dir)
            .with_context(|| format!("Failed to remove old {:?}", public_dir))?;
    }
    fs::rename(staging, public_dir)
        .with_context(|| format!("Failed to publish {:?} to {:?}", staging, public_dir))?;
    Ok(())
}
