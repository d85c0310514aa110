//! Java front end
//!
//! Parses Java source with tree-sitter and lowers the concrete syntax tree
//! into the host model. The lowered unit carries byte spans that point back
//! into the original text; comments are not part of it and are only reported
//! to a [`ScanListener`] while the concrete tree is walked.

mod lower;
mod unescape;

pub(crate) use unescape::unescape;

use crate::error::JGraftError;
use crate::host::Tree;
use crate::Result;
use biome_text_size::{TextRange, TextSize};
use lower::Lowerer;

/// Receives the leaf ranges of a scan in source order
pub trait ScanListener {
    /// A significant token
    fn token(&mut self, _range: TextRange) {}

    /// A line or block comment
    fn comment(&mut self, _range: TextRange) {}
}

/// Listener that ignores everything
struct Silent;

impl ScanListener for Silent {}

/// A syntax problem found by the parser; the unit is still produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub range: TextRange,
    pub message: String,
}

/// Result of parsing one compilation unit
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub unit: Tree,
    pub syntax_errors: Vec<SyntaxError>,
}

impl ParsedUnit {
    pub fn has_errors(&self) -> bool {
        !self.syntax_errors.is_empty()
    }
}

/// tree-sitter backed Java parser
pub struct JavaParser {
    parser: tree_sitter::Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| JGraftError::internal_error(format!("Java grammar rejected: {e}")))?;
        Ok(Self { parser })
    }

    /// Parse `source` into a host compilation unit
    pub fn parse(&mut self, file_name: &str, source: &str) -> Result<ParsedUnit> {
        self.parse_with_listener(file_name, source, &mut Silent)
    }

    /// Parse `source`, reporting every token and comment to `listener`
    pub fn parse_with_listener(
        &mut self,
        file_name: &str,
        source: &str,
        listener: &mut dyn ScanListener,
    ) -> Result<ParsedUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| JGraftError::parse_error(file_name, "parser produced no tree"))?;
        let root = tree.root_node();

        let syntax_errors = scan(root, source, listener);
        if !syntax_errors.is_empty() {
            tracing::debug!(
                "{} syntax errors in {}",
                syntax_errors.len(),
                file_name
            );
        }

        let unit = Lowerer::new(source).unit(root, file_name);
        Ok(ParsedUnit {
            unit,
            syntax_errors,
        })
    }
}

pub(crate) fn is_comment(kind: &str) -> bool {
    kind == "line_comment" || kind == "block_comment"
}

pub(crate) fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Walk every node once: leaves go to the listener, broken nodes become errors
fn scan(
    root: tree_sitter::Node<'_>,
    source: &str,
    listener: &mut dyn ScanListener,
) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        let mut descend = true;

        if node.is_error() {
            let snippet: String = source[node.byte_range()].chars().take(20).collect();
            errors.push(SyntaxError {
                range: text_range(node.start_byte(), node.end_byte()),
                message: format!("unexpected '{}'", snippet.trim()),
            });
        } else if node.is_missing() {
            errors.push(SyntaxError {
                range: text_range(node.start_byte(), node.end_byte()),
                message: format!("missing {}", node.kind()),
            });
        }

        if is_comment(node.kind()) {
            // line comments stop before a carriage return
            let mut end = node.end_byte();
            if source[node.start_byte()..end].ends_with('\r') {
                end -= 1;
            }
            listener.comment(text_range(node.start_byte(), end));
            descend = false;
        } else if node.child_count() == 0 && node.end_byte() > node.start_byte() {
            listener.token(text_range(node.start_byte(), node.end_byte()));
        }

        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return errors;
            }
        }
    }
}
