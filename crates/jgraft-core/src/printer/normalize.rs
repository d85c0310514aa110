use super::options::HEADER_PREFIX;

/// Canonical form of printed or original source for comparison
///
/// Drops a generated header on the first non-blank line and every
/// whitespace-only line, and ends each remaining line with `\n`. Applying it
/// twice changes nothing.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let header = first && line.starts_with(HEADER_PREFIX);
        first = false;
        if header {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_blank_and_header_lines() {
        let text = "// Generated by jgraft at 2024-01-01 00:00:00\r\nclass A {\r\n\t\r\n}\r\n\n";
        assert_eq!(normalize(text), "class A {\n}\n");
    }

    #[test]
    fn test_header_text_later_in_file_is_kept() {
        let text = "class A {\n// Generated by jgraft at noon, by hand\n}\n";
        assert_eq!(normalize(text), text);

        let headed = format!("\n// Generated by jgraft at 2024-01-01 00:00:00\n{text}");
        assert_eq!(normalize(&headed), text);
    }

    #[test]
    fn test_is_fixed_point() {
        let text = "a\n\n  \n\tb  \nc";
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
        assert_eq!(once, "a\n\tb  \nc\n");
    }
}
