//! URL helper functions

/// Prefix a site path with the configured root
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/posts/hello/") // -> "/blog/posts/hello/"
/// url_for("/", "css/typography.css")  // -> "/css/typography.css"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }

    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Absolute URL including the site domain
pub fn full_url_for(url: &str, root: &str, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    format!("{}{}", url.trim_end_matches('/'), url_for(root, path))
}

fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "/posts/hello/"), "/posts/hello/");
        assert_eq!(url_for("/blog/", "/posts/hello/"), "/blog/posts/hello/");
        assert_eq!(url_for("/blog", "about/"), "/blog/about/");
        assert_eq!(url_for("/blog/", "/"), "/blog/");
        assert_eq!(url_for("/", ""), "/");
    }

    #[test]
    fn test_external_urls_pass_through() {
        assert_eq!(
            url_for("/blog/", "https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_full_url_for() {
        assert_eq!(
            full_url_for("https://example.com/", "/blog/", "/posts/a/"),
            "https://example.com/blog/posts/a/"
        );
    }
}
