//! Text normalization and fingerprints.

/// Separator between title and body in a signature. A control character that
/// normalized titles and rendered bodies do not contain.
pub const SIGNATURE_SEPARATOR: char = '\u{1f}';

/// Remove every whitespace character.
///
/// Titles are compared in this form so that incidental whitespace (line
/// wrapping, indentation in the host markup) never changes a decision.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// First `lines` non-empty trimmed lines of `body`, joined with `\n`.
///
/// Empty when the body has no visible text; an empty key never takes part in
/// duplicate detection.
pub fn compute_body_key(body: &str, lines: usize) -> String {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Change-detection fingerprint of an entry.
///
/// Uses the body key when there is one, the raw body otherwise, so that two
/// bodies differing only after the key lines still share a signature.
pub fn compute_signature(normalized_title: &str, body: &str, key_lines: usize) -> String {
    let key = compute_body_key(body, key_lines);
    let body_part = if key.is_empty() { body } else { key.as_str() };

    let mut signature = String::with_capacity(normalized_title.len() + 1 + body_part.len());
    signature.push_str(normalized_title);
    signature.push(SIGNATURE_SEPARATOR);
    signature.push_str(body_part);
    signature
}

/// Length of a key in characters, as used by the minimum-length threshold.
pub fn key_len(key: &str) -> usize {
    key.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_all_whitespace() {
        assert_eq!(normalize("  横田さんが \n クラスで\tあなたに "), "横田さんがクラスであなたに");
        assert_eq!(normalize("\u{3000}全角\u{3000}"), "全角");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_body_key_takes_first_five_non_empty_lines() {
        let body = "\n  one \n\ntwo\nthree\n   \nfour\nfive\nsix\n";
        assert_eq!(compute_body_key(body, 5), "one\ntwo\nthree\nfour\nfive");
    }

    #[test]
    fn test_body_key_handles_crlf() {
        assert_eq!(compute_body_key("a\r\nb\r\n", 5), "a\nb");
    }

    #[test]
    fn test_body_key_empty_body() {
        assert_eq!(compute_body_key("", 5), "");
        assert_eq!(compute_body_key(" \n\t\n ", 5), "");
    }

    #[test]
    fn test_body_key_ignores_trailing_differences() {
        let a = "l1\nl2\nl3\nl4\nl5\nposted 3 minutes ago";
        let b = "l1\nl2\nl3\nl4\nl5\nposted 4 minutes ago";
        assert_eq!(compute_body_key(a, 5), compute_body_key(b, 5));
    }

    #[test]
    fn test_signature_contains_separator() {
        let sig = compute_signature("title", "body", 5);
        assert_eq!(sig, "title\u{1f}body");
    }

    #[test]
    fn test_signature_falls_back_to_raw_body() {
        let sig = compute_signature("title", "  ", 5);
        assert_eq!(sig, "title\u{1f}  ");
    }

    #[test]
    fn test_signature_distinguishes_title_and_body_split() {
        assert_ne!(compute_signature("ab", "c", 5), compute_signature("a", "bc", 5));
    }

    #[test]
    fn test_key_len_counts_characters() {
        assert_eq!(key_len("同じ本文"), 4);
        assert_eq!(key_len("a\nb"), 3);
    }
}
