/// Decode the escape sequences of a string or character literal body
///
/// Malformed escapes are kept verbatim.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };
        match next {
            'b' | 't' | 'n' | 'f' | 'r' | 's' | '"' | '\'' | '\\' => {
                chars.next();
                out.push(match next {
                    'b' => '\u{8}',
                    't' => '\t',
                    'n' => '\n',
                    'f' => '\u{c}',
                    'r' => '\r',
                    's' => ' ',
                    other => other,
                });
            }
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            '0'..='7' => {
                // up to three octal digits, at most \377
                let max_len = if next <= '3' { 3 } else { 2 };
                let mut value = 0u32;
                let mut len = 0;
                while len < max_len {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                            len += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            _ => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r#"a\tb\n\"q\"\\"#), "a\tb\n\"q\"\\");
        assert_eq!(unescape(r"\'"), "'");
    }

    #[test]
    fn test_unicode_and_octal() {
        assert_eq!(unescape(r"A\uu0042"), "AB");
        assert_eq!(unescape(r"\101\0"), "A\0");
        assert_eq!(unescape(r"\477"), "'7");
    }

    #[test]
    fn test_malformed_is_kept() {
        assert_eq!(unescape(r"\q"), r"\q");
        assert_eq!(unescape("end\\"), "end\\");
    }
}
