//! Deep-link query parsing for the magnet pre-fill flow.

/// Query parameter carrying a deep-linked magnet link.
pub const MAGNET_QUERY_KEY: &str = "magnet";

/// Extracts the decoded `magnet` parameter from a location search string.
///
/// Accepts the search with or without its leading `?`. Values are percent- and `+`-decoded the way
/// `URLSearchParams` decodes them; when the key repeats, the last value wins.
pub fn magnet_from_query(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == MAGNET_QUERY_KEY)
        .map(|(_, value)| value.into_owned())
        .last()
}

/// Splits a magnet text area value into one trimmed link per non-empty line.
pub fn magnet_links(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnet_parameter_is_decoded() {
        assert_eq!(magnet_from_query("?magnet=abc123"), Some("abc123".to_string()));
        assert_eq!(
            magnet_from_query("magnet=magnet%3A%3Fxt%3Durn%3Abtih%3Aabc%26dn%3Da+b"),
            Some("magnet:?xt=urn:btih:abc&dn=a b".to_string())
        );
    }

    #[test]
    fn absent_or_repeated_parameter() {
        assert_eq!(magnet_from_query(""), None);
        assert_eq!(magnet_from_query("?open=notes"), None);
        assert_eq!(
            magnet_from_query("?magnet=first&magnet=second"),
            Some("second".to_string())
        );
        assert_eq!(magnet_from_query("?magnet"), Some(String::new()));
    }

    #[test]
    fn text_area_splits_into_links() {
        assert_eq!(
            magnet_links("magnet:?xt=a\n\n  magnet:?xt=b  \r\n"),
            vec!["magnet:?xt=a", "magnet:?xt=b"]
        );
        assert!(magnet_links("  \n").is_empty());
    }
}
