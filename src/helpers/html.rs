//! HTML helper functions

/// Escape text for use in element content or a quoted attribute.
///
/// Unlike Tera's `escape` filter this leaves `/` alone, so URLs stay readable.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
