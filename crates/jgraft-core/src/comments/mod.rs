//! Comment capture
//!
//! The parser drops comments. This module records every comment seen while a
//! compilation unit is scanned, classifies how it connects to the text around
//! it, and keeps the result next to the unit so the printer can put each
//! comment back where it was.
//!
//! Two capture strategies exist and the caller picks one up front:
//!
//! - [`CaptureStrategy::TreeExtras`] listens to the comment tokens the parser
//!   reports while the tree is lowered;
//! - [`CaptureStrategy::LexicalScan`] rescans the source text on its own.
//!
//! Both feed a [`CommentCollector`], so the classification is identical.

mod catcher;
mod collector;
mod scan;

pub use catcher::CommentCatcher;
pub use collector::CommentCollector;
pub use scan::scan_comments;

use biome_text_size::{TextRange, TextSize};
use serde::{Deserialize, Serialize};

/// How a comment relates to the text before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartConnection {
    /// No whitespace between the previous token and the comment
    DirectlyAfterPrevious,
    /// Same line as the previous token, separated by whitespace
    AfterPrevious,
    /// First thing on its line, in column zero
    StartOfLine,
    /// On a later line than the previous token, indented
    OnNextLine,
}

/// How the text after a comment continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndConnection {
    /// A line break (or end of input) follows
    OnNextLine,
    /// Whitespace, then more text on the same line
    AfterComment,
    /// More text immediately
    DirectlyAfterComment,
}

/// A captured comment with its layout metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentToken {
    pub position: TextSize,
    /// End of the previous token or the previous comment, whichever is later
    pub prev_end_position: TextSize,
    pub end_position: TextSize,
    pub start_connection: StartConnection,
    pub end_connection: EndConnection,
    /// Raw text including the delimiters
    pub content: String,
}

impl CommentToken {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.position, self.end_position)
    }

    pub fn is_line_comment(&self) -> bool {
        self.content.starts_with("//")
    }

    pub fn is_doc_comment(&self) -> bool {
        self.content.starts_with("/**") && self.content != "/**/"
    }
}

/// Instrumentation strategy, resolved before capture starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStrategy {
    /// Comments reported by the parser while lowering
    #[default]
    TreeExtras,
    /// Comments found by rescanning the source text
    LexicalScan,
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Classify the gap between the previous token end and the comment start
pub fn start_connection(source: &str, from: usize, to: usize) -> StartConnection {
    if from >= to {
        return StartConnection::DirectlyAfterPrevious;
    }
    let between = &source[from..to];
    if between.chars().next_back().is_some_and(is_newline) {
        return StartConnection::StartOfLine;
    }
    if between.chars().any(is_newline) {
        StartConnection::OnNextLine
    } else {
        StartConnection::AfterPrevious
    }
}

/// Classify what follows the comment ending at `end`
pub fn end_connection(source: &str, end: usize) -> EndConnection {
    let mut first = true;
    for c in source[end..].chars() {
        if is_newline(c) {
            return EndConnection::OnNextLine;
        }
        if c.is_whitespace() {
            first = false;
            continue;
        }
        return if first {
            EndConnection::DirectlyAfterComment
        } else {
            EndConnection::AfterComment
        };
    }
    EndConnection::OnNextLine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_connection() {
        let src = "a;/*x*/ b; /*y*/\n/*z*/\n  /*w*/";
        assert_eq!(start_connection(src, 2, 2), StartConnection::DirectlyAfterPrevious);
        assert_eq!(start_connection(src, 10, 11), StartConnection::AfterPrevious);
        assert_eq!(start_connection(src, 16, 17), StartConnection::StartOfLine);
        assert_eq!(start_connection(src, 22, 25), StartConnection::OnNextLine);
    }

    #[test]
    fn test_end_connection() {
        assert_eq!(end_connection("/*a*/b", 5), EndConnection::DirectlyAfterComment);
        assert_eq!(end_connection("/*a*/  b", 5), EndConnection::AfterComment);
        assert_eq!(end_connection("/*a*/  \nb", 5), EndConnection::OnNextLine);
        assert_eq!(end_connection("// a", 4), EndConnection::OnNextLine);
    }

    #[test]
    fn test_doc_comment_detection() {
        let token = CommentToken {
            position: TextSize::from(0),
            prev_end_position: TextSize::from(0),
            end_position: TextSize::from(8),
            start_connection: StartConnection::DirectlyAfterPrevious,
            end_connection: EndConnection::OnNextLine,
            content: "/** d */".to_string(),
        };
        assert!(token.is_doc_comment());
        assert!(!token.is_line_comment());
    }
}
