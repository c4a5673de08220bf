//! Comparison rules for decoded scan text.

/// Canonical form used when comparing a scan against an expected answer:
/// surrounding whitespace removed and letters upper-cased.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Exact match after normalization. There is no fuzzy matching.
#[must_use]
pub fn answers_match(scanned: &str, expected: &str) -> bool {
    normalize(scanned) == normalize(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_ignores_case_and_surrounding_whitespace() {
        assert!(answers_match("  start ", "START"));
        assert!(answers_match("START", "  start "));
        assert!(answers_match("Finish", "fInIsH"));
    }

    #[test]
    fn match_is_reflexive() {
        for value in ["", "123", " MIDDLE ", "ünïcode"] {
            assert!(answers_match(value, value));
        }
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert!(!answers_match("1 2 3", "123"));
        assert!(!answers_match("STAR", "START"));
    }
}
