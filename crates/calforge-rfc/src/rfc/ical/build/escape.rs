//! iCalendar text escaping utilities.

/// Escapes text for iCalendar TEXT values (RFC 5545 §3.3.11).
///
/// Outside of quoted parameter values backslash, semicolon and comma are
/// escaped; inside quotes backslash and double quote are. Every line break
/// form (CR, LF, CRLF) becomes the literal `\n`.
#[must_use]
pub fn escape(s: &str, in_quotes: bool) -> String {
    let mut result = String::with_capacity(s.len() + 10);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' | ',' if !in_quotes => {
                result.push('\\');
                result.push(c);
            }
            '"' if in_quotes => result.push_str("\\\""),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push_str("\\n");
            }
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes a parameter value if needed.
///
/// Returns the value quoted if it contains special characters.
#[must_use]
pub fn quote_parameter(s: &str) -> String {
    if needs_quoting(s) {
        // Use caret encoding for special chars inside quotes (RFC 6868)
        let mut result = String::with_capacity(s.len() + 10);
        result.push('"');
        for c in s.chars() {
            match c {
                '^' => result.push_str("^^"),
                '\n' => result.push_str("^n"),
                '"' => result.push_str("^'"),
                _ => result.push(c),
            }
        }
        result.push('"');
        result
    } else {
        s.to_string()
    }
}

/// Checks if a parameter value needs quoting.
fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| matches!(c, ':' | ';' | ',' | '"' | '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_basic() {
        assert_eq!(escape("hello, world", false), "hello\\, world");
        assert_eq!(escape("back\\slash", false), "back\\\\slash");
        assert_eq!(escape("semi;colon", false), "semi\\;colon");
        assert_eq!(escape("say \"hi\"", false), "say \"hi\"");
    }

    #[test]
    fn escape_in_quotes() {
        assert_eq!(escape("Doe, Jane; \"JD\"", true), "Doe, Jane; \\\"JD\\\"");
        assert_eq!(escape("a\\b", true), "a\\\\b");
    }

    #[test]
    fn all_line_breaks_normalize() {
        let expected = "line1\\nline2";
        assert_eq!(escape("line1\nline2", false), expected);
        assert_eq!(escape("line1\rline2", false), expected);
        assert_eq!(escape("line1\r\nline2", false), expected);
        assert_eq!(escape("a\r\n\r\nb", false), "a\\n\\nb");
    }

    #[test]
    fn no_unescaped_reserved_characters_remain() {
        let input = "x;y,z\\w\r\nv";
        let escaped = escape(input, false);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let next = chars.next();
                assert!(matches!(next, Some('\\' | ';' | ',' | 'n')), "{next:?}");
            } else {
                assert!(!matches!(c, ';' | ',' | '\r' | '\n'));
            }
        }
    }

    #[test]
    fn escape_keeps_multibyte_scalars() {
        assert_eq!(escape("Café, 日本;🎉", false), "Café\\, 日本\\;🎉");
    }

    #[test]
    fn quote_parameter_simple() {
        assert_eq!(quote_parameter("Simple"), "Simple");
    }

    #[test]
    fn quote_parameter_quoted() {
        assert_eq!(quote_parameter("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(quote_parameter("mailto:a@b"), "\"mailto:a@b\"");
        assert_eq!(quote_parameter("Has\"quote"), "\"Has^'quote\"");
    }
}
