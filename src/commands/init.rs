//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# byteblog configuration

# Site
title: Big Apple Byte
description: ''

# URL
url: http://localhost:4000
root: /
posts_base: posts

# Directory
source_dir: src
public_dir: public
static_dir: static
ignore: []

# Styling
typography: src/utils/typography.css

# Writing
render_drafts: false
excerpt_length: 140
highlight:
  theme: base16-ocean.dark
  line_numbers: false

# Date format (Moment.js tokens)
date_format: MMMM D

# Home page
index:
  show_profile: true
  show_categories: true

profile:
  name: Jon Cravotta
  subtitle: IOS Software Engineer | NYC
  menu:
    - name: Work
    - name: About

header:
  links:
    - name: About
      path: /about/
"#;

const DEFAULT_TYPOGRAPHY: &str = r#"html {
  font-family: Georgia, serif;
  font-size: 18px;
  line-height: 1.6;
}

h1, h2, h3 {
  font-family: "Helvetica Neue", Helvetica, sans-serif;
  line-height: 1.2;
}
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join(CONFIG_FILE).exists() {
        bail!("{:?} already contains a {}", target_dir, CONFIG_FILE);
    }

    fs::create_dir_all(target_dir.join("src/posts"))?;
    fs::create_dir_all(target_dir.join("src/utils"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    fs::write(
        target_dir.join("src/utils/typography.css"),
        DEFAULT_TYPOGRAPHY,
    )?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
categories: meta
---

Welcome to the blog! Posts live in `src/posts`. Each one becomes a page at
`/posts/<file-name>/`.

## Writing a post

```bash
$ byteblog new "My New Post"
```

## Previewing

```bash
$ byteblog serve
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("src/posts/hello-world.md"), sample_post)?;

    Ok(())
}
