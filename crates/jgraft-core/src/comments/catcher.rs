use super::CommentToken;
use crate::host::{JTree, Tree};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

struct Entry {
    unit: Weak<JTree>,
    comments: Rc<[CommentToken]>,
}

/// Side table of captured comments, keyed by compilation unit identity
///
/// Entries hold the unit weakly: once the unit is dropped its comments are
/// unreachable and are purged on the next write.
#[derive(Default)]
pub struct CommentCatcher {
    entries: RefCell<HashMap<usize, Entry>>,
}

impl CommentCatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(unit: &Tree) -> usize {
        Rc::as_ptr(unit) as usize
    }

    /// Store the comments of `unit`; `None` removes them
    pub fn set_comments(&self, unit: &Tree, comments: Option<Vec<CommentToken>>) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, entry| entry.unit.strong_count() > 0);

        match comments {
            Some(mut comments) => {
                comments.sort_by_key(|comment| comment.position);
                comments.dedup_by_key(|comment| comment.position);
                tracing::debug!("Storing {} comments for unit", comments.len());
                entries.insert(
                    Self::key(unit),
                    Entry {
                        unit: Rc::downgrade(unit),
                        comments: comments.into(),
                    },
                );
            }
            None => {
                entries.remove(&Self::key(unit));
            }
        }
    }

    /// Comments of `unit`, empty when none were stored
    pub fn comments(&self, unit: &Tree) -> Rc<[CommentToken]> {
        let entries = self.entries.borrow();
        entries
            .get(&Self::key(unit))
            .filter(|entry| {
                entry
                    .unit
                    .upgrade()
                    .is_some_and(|stored| Rc::ptr_eq(&stored, unit))
            })
            .map(|entry| entry.comments.clone())
            .unwrap_or_else(|| Rc::from(Vec::new()))
    }

    /// Number of entries whose unit is still alive
    pub fn live_units(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|entry| entry.unit.strong_count() > 0)
            .count()
    }
}
