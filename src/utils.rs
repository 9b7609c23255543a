use url::Url;

/// Canonical string form of a URL, so "https://a.test" and "https://a.test/"
/// compare equal. Unparsable input is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

/// Convert a URL to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%'], "_");

    // Limit filename length
    if name.len() > 200 {
        name.chars().take(200).collect()
    } else {
        name
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            sanitize_filename("https://example.test/inventory?firstRecord=0&numRecords=2"),
            "example.test_inventory_firstRecord_0_numRecords_2"
        );
    }

    #[test]
    fn test_normalize_url_adds_root_slash() {
        assert_eq!(normalize_url("https://example.test"), "https://example.test/");
        assert_eq!(normalize_url("not a url"), "not a url");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  45,000\n   miles \t"), "45,000 miles");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
