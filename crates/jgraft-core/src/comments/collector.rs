use super::{CommentToken, end_connection, start_connection};
use crate::frontend::ScanListener;
use biome_text_size::{TextRange, TextSize};

/// Turns a stream of token and comment ranges into classified comments
pub struct CommentCollector<'s> {
    source: &'s str,
    last_token_end: TextSize,
    last_comment_end: TextSize,
    comments: Vec<CommentToken>,
}

impl<'s> CommentCollector<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            last_token_end: TextSize::from(0),
            last_comment_end: TextSize::from(0),
            comments: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<CommentToken> {
        self.comments
    }
}

impl ScanListener for CommentCollector<'_> {
    fn token(&mut self, range: TextRange) {
        self.last_token_end = range.end();
    }

    fn comment(&mut self, range: TextRange) {
        let prev_end = self.last_token_end.max(self.last_comment_end);
        let start = usize::from(range.start());
        let end = usize::from(range.end());
        self.last_comment_end = range.end();

        let token = CommentToken {
            position: range.start(),
            prev_end_position: prev_end,
            end_position: range.end(),
            start_connection: start_connection(self.source, usize::from(prev_end), start),
            end_connection: end_connection(self.source, end),
            content: self.source[start..end].to_string(),
        };
        tracing::trace!(
            "Captured comment at {:?}: {:?}/{:?}",
            token.position,
            token.start_connection,
            token.end_connection
        );
        self.comments.push(token);
    }
}
