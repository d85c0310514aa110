//! Lexical comment scan
//!
//! Finds comments by scanning the raw text, skipping over string, text block
//! and character literals so that `"//"` inside a literal is not a comment.
//! Everything else that is not whitespace counts as token text.

use super::{CommentCollector, CommentToken};
use crate::frontend::ScanListener;
use biome_text_size::{TextRange, TextSize};

/// Scan `source` and return its classified comments in position order
pub fn scan_comments(source: &str) -> Vec<CommentToken> {
    let mut collector = CommentCollector::new(source);
    let len = source.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(source, i) else {
            break;
        };
        let start = i;

        match current {
            c if c.is_whitespace() => {
                i += size;
            }
            '/' if source[i + size..].starts_with('/') => {
                let mut end = i + 2;
                while let Some((c, step)) = next_char(source, end) {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    end += step;
                }
                collector.comment(span(start, end));
                i = end;
            }
            '/' if source[i + size..].starts_with('*') => {
                // unterminated block comments run to the end of input
                let end = source[i + 2..]
                    .find("*/")
                    .map(|offset| i + 2 + offset + 2)
                    .unwrap_or(len);
                collector.comment(span(start, end));
                i = end;
            }
            '"' if source[i..].starts_with("\"\"\"") => {
                let end = lex_quoted(source, i + 3, "\"\"\"");
                collector.token(span(start, end));
                i = end;
            }
            '"' => {
                let end = lex_quoted(source, i + 1, "\"");
                collector.token(span(start, end));
                i = end;
            }
            '\'' => {
                let end = lex_quoted(source, i + 1, "'");
                collector.token(span(start, end));
                i = end;
            }
            _ => {
                collector.token(span(start, i + size));
                i += size;
            }
        }
    }

    collector.finish()
}

/// End offset of a literal whose body starts at `from` and closes with `close`
fn lex_quoted(source: &str, from: usize, close: &str) -> usize {
    let single_line = close != "\"\"\"";
    let mut i = from;
    while let Some((c, step)) = next_char(source, i) {
        if c == '\\' {
            i += step;
            if let Some((_, escaped)) = next_char(source, i) {
                i += escaped;
            }
            continue;
        }
        if source[i..].starts_with(close) {
            return i + close.len();
        }
        if single_line && (c == '\n' || c == '\r') {
            // unterminated literal; stop at the line end
            return i;
        }
        i += step;
    }
    source.len()
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{EndConnection, StartConnection};

    #[test]
    fn test_line_and_block_comments() {
        let src = "int x = 1; // one\n/* two */ int y;";
        let comments = scan_comments(src);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "// one");
        assert_eq!(comments[0].start_connection, StartConnection::AfterPrevious);
        assert_eq!(comments[0].end_connection, EndConnection::OnNextLine);
        assert_eq!(comments[1].content, "/* two */");
        assert_eq!(comments[1].start_connection, StartConnection::StartOfLine);
        assert_eq!(comments[1].end_connection, EndConnection::AfterComment);
    }

    #[test]
    fn test_literals_hide_comment_markers() {
        let src = "String s = \"// not\"; char c = '/'; String t = \"\"\"\n/* no */\n\"\"\";";
        assert!(scan_comments(src).is_empty());
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let src = "s = \"a\\\"//\"; // yes";
        let comments = scan_comments(src);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "// yes");
    }

    #[test]
    fn test_positions_are_increasing() {
        let src = "/*a*/ class A { /*b*/ } // c\n";
        let comments = scan_comments(src);
        let positions: Vec<_> = comments.iter().map(|c| c.position).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(comments[0].start_connection, StartConnection::DirectlyAfterPrevious);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let comments = scan_comments("x /* open");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "/* open");
    }
}
