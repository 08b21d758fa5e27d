/// Accepts a `return_to` value only when it is a local path.
///
/// A valid value starts with a single `/`, carries no scheme and contains
/// no control characters. Anything else yields `None` and callers fall
/// back to `/`.
///
/// ```
/// use fanzone_core::auth::validate_return_to;
///
/// assert_eq!(validate_return_to("/news_detail/3"), Some("/news_detail/3"));
/// assert_eq!(validate_return_to("//evil.com"), None);
/// assert_eq!(validate_return_to("https://evil.com"), None);
/// ```
pub fn validate_return_to(url: &str) -> Option<&str> {
    if !url.starts_with('/') || url.starts_with("//") {
        return None;
    }

    // Browsers treat a backslash after the first slash like a second slash.
    if url.starts_with("/\\") {
        return None;
    }

    if url.chars().any(char::is_control) || url.contains("://") {
        return None;
    }

    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_local_paths() {
        assert_eq!(validate_return_to("/"), Some("/"));
        assert_eq!(validate_return_to("/news?page=2"), Some("/news?page=2"));
        assert_eq!(
            validate_return_to("/news_detail/7#comments"),
            Some("/news_detail/7#comments")
        );
        assert_eq!(
            validate_return_to("/teams?host=localhost:8080"),
            Some("/teams?host=localhost:8080")
        );
    }

    #[test]
    fn rejects_absolute_urls() {
        assert_eq!(validate_return_to("https://evil.com"), None);
        assert_eq!(validate_return_to("javascript:alert(1)"), None);
        assert_eq!(validate_return_to("/redirect?url=https://evil.com"), None);
    }

    #[test]
    fn rejects_protocol_relative_urls() {
        assert_eq!(validate_return_to("//evil.com"), None);
        assert_eq!(validate_return_to("/\\evil.com"), None);
    }

    #[test]
    fn rejects_relative_and_empty() {
        assert_eq!(validate_return_to("news"), None);
        assert_eq!(validate_return_to(""), None);
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(validate_return_to("/path\n/evil"), None);
        assert_eq!(validate_return_to("/path\0"), None);
        assert_eq!(validate_return_to("/path\t"), None);
    }
}
