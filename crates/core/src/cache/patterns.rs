//! Glob matching for cache invalidation patterns.

/// Checks if a cache key matches a glob pattern.
///
/// `*` matches any sequence of characters, including none. Every other
/// character matches itself.
///
/// # Examples
///
/// ```
/// use trialsync_core::cache::pattern_matches;
///
/// assert!(pattern_matches("listAll:*", r#"listAll:{"status":"Active"}"#));
/// assert!(pattern_matches("*:{}", "listAll:{}"));
/// assert!(!pattern_matches("getById:*", "listAll:{}"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut segments = pattern.split('*');

    // `split` always yields at least one segment.
    let Some(head) = segments.next() else {
        return key.is_empty();
    };
    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(pattern_matches("listAll:{}", "listAll:{}"));
        assert!(!pattern_matches("listAll:{}", "listAll:{} "));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(pattern_matches("getById:*", r#"getById:{"id":"p-1"}"#));
        assert!(pattern_matches("getById:*", "getById:"));
        assert!(!pattern_matches("getById:*", "getBy"));
    }

    #[test]
    fn test_leading_and_middle_wildcards() {
        assert!(pattern_matches("*:{}", "listAll:{}"));
        assert!(pattern_matches("get*:*p-1*", r#"getById:{"id":"p-1"}"#));
        assert!(!pattern_matches("get*:*p-2*", r#"getById:{"id":"p-1"}"#));
    }

    #[test]
    fn test_suffix_must_not_overlap_prefix() {
        assert!(!pattern_matches("ab*ba", "aba"));
        assert!(pattern_matches("ab*ba", "abba"));
    }

    #[test]
    fn test_adjacent_wildcards_act_as_one() {
        assert!(pattern_matches("list**:*", "listAll:{}"));
        assert!(pattern_matches("**", "anything"));
    }

    #[test]
    fn test_empty_pattern_and_key() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "listAll:{}"));
        assert!(pattern_matches("*", ""));
        assert!(!pattern_matches("listAll:*", ""));
    }
}
