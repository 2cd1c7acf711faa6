/// Normalize a tag name for validation, lookup and storage.
/// Create and lookup paths must agree on this, otherwise
/// `" foo "` and `"foo"` resolve to different tags.
pub fn normalize(name: &str) -> &str {
    name.trim()
}

/// Normalize a batch of names, dropping duplicates while
/// preserving first-seen order.
pub fn normalize_distinct<'a>(names: &Vec<&'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    names.iter()
        .map(|n| normalize(n))
        .filter(|n| seen.insert(*n))
        .collect()
}

#[cfg(test)]
mod suite {
    use super::*;

    #[test]
    fn check_normalize() {
        assert_eq!(normalize("  foo "), "foo");
        assert_eq!(normalize("foo"), "foo");
        assert_eq!(normalize("\tfoo\n"), "foo");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn check_normalize_distinct() {
        assert_eq!(normalize_distinct(&vec!["a", "a", " a ", "b"]), vec!["a", "b"]);
        let empty: Vec<&str> = Vec::new();
        assert_eq!(normalize_distinct(&empty), empty);
    }
}
