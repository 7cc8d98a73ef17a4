//! Asset path parsing.
//!
//! Asset references may carry a query suffix (`logo.png?v=2`), which is
//! ignored for classification and never reaches the output path.

/// Split `path?query` into the path and the optional query (without `?`).
pub fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    }
}

/// Split the final path component into `(name, extension)`.
///
/// The extension is the text after the last `.`; the name is everything
/// before it. Returns `None` when there is no extension: no dot, a leading
/// dot only (`.gitignore`), or a trailing dot (`file.`).
pub fn file_parts(path: &str) -> Option<(&str, &str)> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (name, ext) = file_name.rsplit_once('.')?;
    if name.is_empty() || ext.is_empty() {
        return None;
    }
    Some((name, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("logo.png"), ("logo.png", None));
        assert_eq!(split_query("logo.png?v=2"), ("logo.png", Some("v=2")));
        assert_eq!(split_query("font.woff?#iefix"), ("font.woff", Some("#iefix")));
    }

    #[test]
    fn test_file_parts() {
        assert_eq!(file_parts("images/hero.png"), Some(("hero", "png")));
        assert_eq!(file_parts("vendor/jquery.min.js"), Some(("jquery.min", "js")));
        assert_eq!(file_parts("dir.v2/README"), None);
        assert_eq!(file_parts(".gitignore"), None);
        assert_eq!(file_parts("file."), None);
        assert_eq!(file_parts("Logo.PNG"), Some(("Logo", "PNG")));
    }
}
