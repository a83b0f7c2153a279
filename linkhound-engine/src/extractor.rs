use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Absolute http(s) URLs appearing anywhere in the page, including inside
// script bodies and comments.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,}(?:/[^"'\s<>`]*)?"#)
        .expect("invalid URL pattern")
});

// Quoted filesystem-style references: "./x", "../x" and "/x".
static PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'](\.?\.?/[^"'\s<>`]+)["']"#).expect("invalid path pattern")
});

// href= and src= attribute values, whatever they point at.
static ATTR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:href|src)=["']([^"']+)["']"#).expect("invalid attribute pattern"));

/// Extracts candidate link strings from raw page content.
///
/// Pure and deterministic: no resolution, no validation, no I/O. Candidates
/// are deduplicated by exact string equality with insertion order preserved;
/// the three patterns are scanned in a fixed order (absolute URLs, then
/// quoted paths, then attributes) so earlier passes win dedup ties. Matches
/// that are empty, a single character, or contain whitespace are dropped.
pub fn extract(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    let mut add = |candidate: &str| {
        if candidate.len() > 1
            && !candidate.contains(' ')
            && !candidate.contains('\n')
            && seen.insert(candidate.to_string())
        {
            found.push(candidate.to_string());
        }
    };

    for m in URL_PATTERN.find_iter(content) {
        add(m.as_str());
    }
    for caps in PATH_PATTERN.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            add(m.as_str());
        }
    }
    for caps in ATTR_PATTERN.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            add(m.as_str());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_three_pattern_kinds_in_scan_order() {
        // '/p' is a quoted path too, so the path pass claims it (in content
        // position, before "./rel/path") and the attribute pass loses the
        // dedup tie. Absolute URLs still come first.
        let content = r#"<a href='/p'>x</a> see https://ex.com/q "./rel/path""#;
        let links = extract(content);
        assert_eq!(links, vec!["https://ex.com/q", "/p", "./rel/path"]);
    }

    #[test]
    fn deduplicates_preserving_first_seen_order() {
        let content = r#"
            https://ex.com/a https://ex.com/b https://ex.com/a
            <img src="https://ex.com/b">
        "#;
        let links = extract(content);
        assert_eq!(links, vec!["https://ex.com/a", "https://ex.com/b"]);
    }

    #[test]
    fn drops_single_character_and_whitespace_matches() {
        let content = r#"<a href='/'>root</a> <a href='/a b'>spaced</a>"#;
        assert!(extract(content).is_empty());
    }

    #[test]
    fn finds_relative_parent_paths() {
        let content = r#"<script src="../js/app.js"></script>"#;
        let links = extract(content);
        assert_eq!(links, vec!["../js/app.js"]);
    }

    #[test]
    fn absolute_url_stops_at_quotes_and_angle_brackets() {
        let content = r#"<a href="https://ex.com/page?id=1">link</a>"#;
        let links = extract(content);
        assert_eq!(links, vec!["https://ex.com/page?id=1"]);
    }

    #[test]
    fn bare_hostname_without_tld_is_ignored() {
        let content = "http://localhost/admin";
        assert!(extract(content).is_empty());
    }

    #[test]
    fn empty_content_yields_no_links() {
        assert!(extract("").is_empty());
    }
}
