//! Reporting diagnostics against wrapper nodes
//!
//! The coordinator talks to the host log only through [`DiagnosticHost`].
//! Queue suppression and error counting are capabilities a host may lack;
//! both degrade to doing nothing.

use crate::host::{DiagnosticHost, DiagnosticKind, Tree};
use tracing::trace;

/// Half-open byte range `[start, end)` of a node in its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRange {
    pub start: u32,
    pub end: u32,
}

impl DiagnosticRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Range of a host node, if it carries a source span
    pub fn of(tree: &Tree) -> Option<Self> {
        let span = tree.span()?;
        Some(Self::new(span.start().into(), span.end().into()))
    }

    pub fn contains(&self, position: u32) -> bool {
        self.start <= position && position < self.end
    }
}

/// Restores the log's previous source file when dropped
struct SourceGuard<'a, H: DiagnosticHost + ?Sized> {
    host: &'a H,
    previous: Option<Option<String>>,
}

impl<H: DiagnosticHost + ?Sized> Drop for SourceGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.host.use_source(previous);
        }
    }
}

/// Restores the log's repeated-error setting when dropped
struct RepeatGuard<'a, H: DiagnosticHost + ?Sized> {
    host: &'a H,
    previous: bool,
}

impl<H: DiagnosticHost + ?Sized> Drop for RepeatGuard<'_, H> {
    fn drop(&mut self) {
        self.host.set_multiple_errors(self.previous);
    }
}

pub struct DiagnosticCoordinator<'a, H: DiagnosticHost + ?Sized> {
    host: &'a H,
    source_name: String,
}

impl<'a, H: DiagnosticHost + ?Sized> DiagnosticCoordinator<'a, H> {
    pub fn new(host: &'a H, source_name: impl Into<String>) -> Self {
        Self {
            host,
            source_name: source_name.into(),
        }
    }

    /// Drop queued diagnostics that start inside `range`
    ///
    /// Returns how many were removed.
    pub fn suppress(&self, range: DiagnosticRange) -> usize {
        let Some(queue) = self.host.deferred_queue() else {
            trace!("Host log has no deferred queue, nothing to suppress");
            return 0;
        };
        let Ok(mut queue) = queue.try_borrow_mut() else {
            trace!("Deferred queue is busy, skipping suppression");
            return 0;
        };
        let before = queue.len();
        queue.retain(|diagnostic| !diagnostic.position.is_some_and(|pos| range.contains(pos)));
        let removed = before - queue.len();
        if removed > 0 {
            trace!(
                "Suppressed {} queued diagnostic(s) in [{}, {})",
                removed, range.start, range.end
            );
        }
        removed
    }

    /// Emit a diagnostic in this coordinator's source file
    ///
    /// With `suppress` set, queued diagnostics in that range are dropped first.
    /// Errors are emitted with repeats allowed; the host's own setting is
    /// back in place afterwards.
    pub fn report(
        &self,
        kind: DiagnosticKind,
        message: &str,
        position: Option<u32>,
        suppress: Option<DiagnosticRange>,
    ) {
        let _guard = SourceGuard {
            host: self.host,
            previous: Some(self.host.use_source(Some(self.source_name.clone()))),
        };

        if let Some(range) = suppress {
            self.suppress(range);
        }

        let _repeats = (kind == DiagnosticKind::Error).then(|| RepeatGuard {
            host: self.host,
            previous: self.host.set_multiple_errors(true),
        });
        if kind == DiagnosticKind::Error {
            match self.host.error_counter() {
                Some(counter) => match counter.get().checked_add(1) {
                    Some(count) => counter.set(count),
                    None => trace!("Error counter saturated"),
                },
                None => trace!("Host log does not count errors"),
            }
        }

        self.host.emit(kind, message, position);
    }
}
