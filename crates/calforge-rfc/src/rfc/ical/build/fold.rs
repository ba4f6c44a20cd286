//! Content line folding for iCalendar (RFC 5545 §3.1).

/// Maximum content octets per physical line. Continuation lines add one
/// leading space, keeping every physical line within 75 octets.
const MAX_CONTENT_OCTETS: usize = 74;

/// Folds every CRLF-separated line of a document.
#[must_use]
pub fn fold_lines(document: &str) -> String {
    document
        .split("\r\n")
        .map(fold_line)
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Folds a single content line (without its terminator).
///
/// Lines are folded by inserting CRLF followed by a single space. Octets are
/// counted per character so UTF-8 sequences are never split; after a fold
/// the counter restarts at the size of the character that caused it.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_CONTENT_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + (line.len() / MAX_CONTENT_OCTETS) * 3);
    let mut octets = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();
        octets += char_len;

        if octets > MAX_CONTENT_OCTETS {
            result.push_str("\r\n ");
            octets = char_len;
        }

        result.push(c);
    }

    result
}
