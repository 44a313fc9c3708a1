//! Splitting a tune into its field-line header and notation body.

/// A tune split at the first non-header line.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneText {
    pub header: String,
    pub body: String,
}

/// Splits a tune into header and body. Field lines (`X:`, `K:` and
/// the rest), `%` comment lines and blank lines belong to the header;
/// the first line that is none of those starts the body, and
/// everything after it stays in the body no matter how it looks.
pub fn split_tune(tune: &str) -> TuneText {
    let mut header_lines = Vec::new();
    let mut body_lines = Vec::new();
    let mut in_body = false;
    for line in tune.split('\n') {
        if in_body {
            body_lines.push(line);
            continue;
        }
        let trimmed = line.trim();
        if is_field_line(trimmed) || trimmed.starts_with('%') || trimmed.is_empty() {
            header_lines.push(line);
        } else {
            in_body = true;
            body_lines.push(line);
        }
    }
    TuneText {
        header: header_lines.join("\n").trim().to_string(),
        body: body_lines.join("\n").trim().to_string(),
    }
}

fn is_field_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(first), Some(':')) if first.is_ascii_alphabetic()
    )
}

/// Reads the key name out of a header: the token after `K:` on the
/// first line that carries one. Defaults to C.
pub fn sheet_key(header: &str) -> &str {
    for line in header.lines() {
        if let Some(rest) = line.strip_prefix("K:") {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            if end > 0 {
                return &rest[..end];
            }
        }
    }
    "C"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_and_body() {
        let tune = split_tune("X:1\nK:G\nT:Reel\n|abc|");
        assert_eq!(tune.header, "X:1\nK:G\nT:Reel");
        assert_eq!(tune.body, "|abc|");
    }

    #[test]
    fn test_comments_and_blank_lines_stay_in_the_header() {
        let tune = split_tune("X:1\n% tuning note\n\nK:F\n|c|");
        assert_eq!(tune.header, "X:1\n% tuning note\n\nK:F");
        assert_eq!(tune.body, "|c|");
    }

    #[test]
    fn test_body_keeps_later_field_looking_lines() {
        let tune = split_tune("K:C\n|c|\nK:D\n|d|");
        assert_eq!(tune.body, "|c|\nK:D\n|d|");
    }

    #[test]
    fn test_tune_without_header() {
        let tune = split_tune("|c|");
        assert_eq!(tune.header, "");
        assert_eq!(tune.body, "|c|");
    }

    #[test]
    fn test_sheet_key_reads_the_first_key_field() {
        assert_eq!(sheet_key("X:1\nK:Gm\nK:D"), "Gm");
        assert_eq!(sheet_key("K:D major"), "D");
    }

    #[test]
    fn test_sheet_key_skips_empty_fields_and_defaults_to_c() {
        assert_eq!(sheet_key("K:\nK:F"), "F");
        assert_eq!(sheet_key("X:1"), "C");
        assert_eq!(sheet_key(""), "C");
    }
}
