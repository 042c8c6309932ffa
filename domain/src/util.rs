//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Terms at or below this many ASCII bytes must start a token.
const SHORT_TERM_LEN: usize = 3;

/// Check whether lower-cased `haystack` contains the trigger `term`.
///
/// Plain substring containment, except that short ASCII abbreviations such
/// as `ct` or `ecg` must begin a token. Suffixes still count ("ecgs", "cta"),
/// but "doctor" and "infarction" are not CT mentions. Non-ASCII terms
/// (Chinese synonyms) are not whitespace-delimited and always use substring
/// containment.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if !term.is_ascii() || term.len() > SHORT_TERM_LEN {
        return haystack.contains(term);
    }

    let bytes = haystack.as_bytes();
    haystack
        .match_indices(term)
        .any(|(start, _)| start == 0 || !bytes[start - 1].is_ascii_alphanumeric())
}

/// Check whether `haystack` contains any of `terms`.
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| contains_term(haystack, term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "心电图"; // 9 bytes: 3+3+3
        assert_eq!(truncate_str(s, 4), "心");
        assert_eq!(truncate_str(s, 6), "心电");
    }

    #[test]
    fn short_terms_must_start_a_token() {
        assert!(contains_term("ct scan of the chest", "ct"));
        assert!(contains_term("abdominal ct", "ct"));
        assert!(contains_term("ordered (ct) yesterday", "ct"));
        assert!(!contains_term("seen by the doctor", "ct"));
        assert!(!contains_term("myocardial infarction", "ct"));
    }

    #[test]
    fn short_terms_accept_suffixes() {
        assert!(contains_term("serial ecgs abnormal", "ecg"));
        assert!(contains_term("mris and cts ordered", "mri"));
        assert!(contains_term("mris and cts ordered", "ct"));
        assert!(contains_term("cta of the chest", "ct"));
    }

    #[test]
    fn long_terms_use_substring_match() {
        assert!(contains_term("metastatic tumors noted", "tumor"));
        assert!(contains_term("irregular heartbeat", "heart"));
    }

    #[test]
    fn chinese_terms_use_substring_match() {
        assert!(contains_term("患者男性，主诉胸痛3天", "胸痛"));
        assert!(!contains_term("患者男性", "胸痛"));
    }

    #[test]
    fn empty_term_never_matches() {
        assert!(!contains_term("anything", ""));
        assert!(!contains_any("anything", &[]));
    }
}
