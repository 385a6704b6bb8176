/// Return the text strictly between the first `start` token and the first
/// `end` token that follows it.
///
/// A missing token yields an empty string instead of an error, so one absent
/// field never rejects the whole line.
pub fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_idx) = text.find(start) else {
        return "";
    };
    let rest = &text[start_idx + start.len()..];
    match rest.find(end) {
        Some(end_idx) => &rest[..end_idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_between_tokens() {
        assert_eq!(extract_between("A[Class B]C", "[Class ", "]"), "B");
    }

    #[test]
    fn test_missing_tokens_yield_empty() {
        assert_eq!(extract_between("no-tokens", "X", "Y"), "");
        assert_eq!(extract_between("start X but no end", "X", "Y"), "");
        assert_eq!(extract_between("end Y before X", "X", "Y"), "");
    }

    #[test]
    fn test_end_token_searched_after_start() {
        let line = "'skip' killed by 'Bob' using 'Gun'";
        assert_eq!(extract_between(line, "killed by '", "'"), "Bob");
    }

    #[test]
    fn test_first_start_token_wins() {
        assert_eq!(extract_between("<a> <b>", "<", ">"), "a");
    }

    #[test]
    fn test_adjacent_tokens_yield_empty() {
        assert_eq!(extract_between("using ''", "using '", "'"), "");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            extract_between("in zone 'Zoné_Ü' killed", "in zone '", "'"),
            "Zoné_Ü"
        );
    }
}
