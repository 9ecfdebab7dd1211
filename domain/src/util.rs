//! Shared utility functions.

/// Approximate the token count of a text by counting whitespace-delimited
/// runs.
///
/// This is not a real tokenizer — it is the documented approximation used
/// for the `token_count` field of interaction log records, where a rough
/// size signal is enough.
pub fn approx_token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whitespace_runs() {
        assert_eq!(approx_token_count("one two  three\nfour\tfive"), 5);
    }

    #[test]
    fn empty_text_has_zero_tokens() {
        assert_eq!(approx_token_count(""), 0);
        assert_eq!(approx_token_count("   \n "), 0);
    }

    #[test]
    fn single_word() {
        assert_eq!(approx_token_count("hello"), 1);
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // 'の' is 3 bytes (U+306E): bytes 0xe3 0x81 0xae
        let s = "あのね"; // 9 bytes: 3+3+3
        // Cutting at byte 4 would land inside 'の', should back up to 3
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 6), "あの");
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate_str("", 10), "");
    }
}
