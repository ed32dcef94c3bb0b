//! Shared utility functions.

/// Cut a string to at most `max_bytes`, backing off to the previous UTF-8
/// character boundary.
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

/// One-line preview for log output: newlines collapsed, `...` appended when
/// the input was cut.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let single_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_str(&single_line, max_bytes);
    if cut.len() < single_line.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_input() {
        assert_eq!(truncate_str("Tokyo", 10), "Tokyo");
    }

    #[test]
    fn truncate_backs_off_to_char_boundary() {
        // "Zürich": 'ü' occupies bytes 1..3
        assert_eq!(truncate_str("Zürich", 2), "Z");
        assert_eq!(truncate_str("Zürich", 3), "Zü");
    }

    #[test]
    fn preview_collapses_whitespace_and_marks_cut() {
        assert_eq!(preview("Show me\n  San Francisco", 100), "Show me San Francisco");
        assert_eq!(preview("Show me San Francisco", 7), "Show me...");
    }
}
