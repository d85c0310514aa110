//! The host's diagnostic channel
//!
//! [`DiagnosticLog`] plays the role of the compiler's message log: it knows
//! which source file is current, may hold a queue of deferred diagnostics
//! that have not been emitted yet, and may keep an error count. The queue and
//! the counter are optional capabilities; callers discover them through the
//! [`DiagnosticHost`] trait.

use std::cell::{Cell, RefCell};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Error,
    Warning,
    MandatoryWarning,
    Note,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::MandatoryWarning => "mandatory warning",
            DiagnosticKind::Note => "note",
        };
        f.write_str(label)
    }
}

/// One diagnostic as the host records it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub source: Option<String>,
    /// Byte offset of the start of the offending range
    pub position: Option<u32>,
}

impl fmt::Display for HostDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.position) {
            (Some(source), Some(pos)) => {
                write!(f, "{source}@{pos}: {}: {}", self.kind, self.message)
            }
            (Some(source), None) => write!(f, "{source}: {}: {}", self.kind, self.message),
            _ => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Capabilities the diagnostic coordinator needs from a host log
pub trait DiagnosticHost {
    /// Switch the current source file, returning the previous one
    fn use_source(&self, source: Option<String>) -> Option<String>;

    /// Emit a diagnostic against the current source file
    fn emit(&self, kind: DiagnosticKind, message: &str, position: Option<u32>);

    /// Queue of diagnostics not emitted yet, if the host keeps one
    fn deferred_queue(&self) -> Option<&RefCell<Vec<HostDiagnostic>>> {
        None
    }

    /// Error counter, if the host exposes one
    fn error_counter(&self) -> Option<&Cell<usize>> {
        None
    }

    /// Allow several errors at the same position to be reported, returning
    /// the previous setting
    fn set_multiple_errors(&self, _enabled: bool) -> bool {
        false
    }
}

/// In-process host log with every optional capability switched on or off
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    source: RefCell<Option<String>>,
    deferred: Option<RefCell<Vec<HostDiagnostic>>>,
    emitted: RefCell<Vec<HostDiagnostic>>,
    error_count: Option<Cell<usize>>,
    multiple_errors: Cell<bool>,
}

impl DiagnosticLog {
    /// Log with a deferred queue and an error counter
    pub fn new() -> Self {
        Self {
            deferred: Some(RefCell::new(Vec::new())),
            error_count: Some(Cell::new(0)),
            ..Self::default()
        }
    }

    /// Log that exposes neither a deferred queue nor an error counter
    pub fn without_capabilities() -> Self {
        Self::default()
    }

    pub fn current_source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    /// Queue a diagnostic; it is emitted by [`DiagnosticLog::flush_deferred`].
    /// Without a deferred queue it is emitted straight away.
    pub fn defer(&self, kind: DiagnosticKind, message: &str, position: Option<u32>) {
        let diagnostic = self.diagnostic(kind, message, position);
        match &self.deferred {
            Some(queue) => queue.borrow_mut().push(diagnostic),
            None => self.push_emitted(diagnostic),
        }
    }

    /// Emit everything still queued, in queue order
    pub fn flush_deferred(&self) {
        let Some(queue) = &self.deferred else {
            return;
        };
        let pending = std::mem::take(&mut *queue.borrow_mut());
        for diagnostic in pending {
            self.push_emitted(diagnostic);
        }
    }

    pub fn deferred(&self) -> Vec<HostDiagnostic> {
        self.deferred
            .as_ref()
            .map(|queue| queue.borrow().clone())
            .unwrap_or_default()
    }

    pub fn emitted(&self) -> Vec<HostDiagnostic> {
        self.emitted.borrow().clone()
    }

    pub fn error_count(&self) -> Option<usize> {
        self.error_count.as_ref().map(Cell::get)
    }

    pub fn multiple_errors(&self) -> bool {
        self.multiple_errors.get()
    }

    fn diagnostic(&self, kind: DiagnosticKind, message: &str, position: Option<u32>) -> HostDiagnostic {
        HostDiagnostic {
            kind,
            message: message.to_string(),
            source: self.current_source(),
            position,
        }
    }

    fn push_emitted(&self, diagnostic: HostDiagnostic) {
        let mut emitted = self.emitted.borrow_mut();
        let duplicate = !self.multiple_errors.get()
            && diagnostic.kind == DiagnosticKind::Error
            && emitted.iter().any(|seen| {
                seen.kind == DiagnosticKind::Error
                    && seen.source == diagnostic.source
                    && seen.position == diagnostic.position
            });
        if duplicate {
            tracing::trace!("Dropping repeated error at {:?}", diagnostic.position);
            return;
        }
        match diagnostic.kind {
            DiagnosticKind::Error => tracing::debug!("{}", diagnostic),
            _ => tracing::trace!("{}", diagnostic),
        }
        emitted.push(diagnostic);
    }
}

impl DiagnosticHost for DiagnosticLog {
    fn use_source(&self, source: Option<String>) -> Option<String> {
        std::mem::replace(&mut *self.source.borrow_mut(), source)
    }

    fn emit(&self, kind: DiagnosticKind, message: &str, position: Option<u32>) {
        let diagnostic = self.diagnostic(kind, message, position);
        self.push_emitted(diagnostic);
    }

    fn deferred_queue(&self) -> Option<&RefCell<Vec<HostDiagnostic>>> {
        self.deferred.as_ref()
    }

    fn error_counter(&self) -> Option<&Cell<usize>> {
        self.error_count.as_ref()
    }

    fn set_multiple_errors(&self, enabled: bool) -> bool {
        self.multiple_errors.replace(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_until_flushed() {
        let log = DiagnosticLog::new();
        log.use_source(Some("A.java".to_string()));
        log.defer(DiagnosticKind::Error, "cannot find symbol", Some(12));
        assert_eq!(log.deferred().len(), 1);
        assert!(log.emitted().is_empty());

        log.flush_deferred();
        assert!(log.deferred().is_empty());
        let emitted = log.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].source.as_deref(), Some("A.java"));
    }

    #[test]
    fn test_without_queue_emits_immediately() {
        let log = DiagnosticLog::without_capabilities();
        log.defer(DiagnosticKind::Warning, "unchecked", None);
        assert_eq!(log.emitted().len(), 1);
        assert!(log.deferred_queue().is_none());
        assert!(log.error_counter().is_none());
    }

    #[test]
    fn test_repeated_errors_collapse_unless_enabled() {
        let log = DiagnosticLog::new();
        log.emit(DiagnosticKind::Error, "first", Some(4));
        log.emit(DiagnosticKind::Error, "second", Some(4));
        assert_eq!(log.emitted().len(), 1);

        log.set_multiple_errors(true);
        log.emit(DiagnosticKind::Error, "third", Some(4));
        assert_eq!(log.emitted().len(), 2);
    }

    #[test]
    fn test_display() {
        let diagnostic = HostDiagnostic {
            kind: DiagnosticKind::Warning,
            message: "deprecated".to_string(),
            source: Some("B.java".to_string()),
            position: Some(7),
        };
        assert_eq!(diagnostic.to_string(), "B.java@7: warning: deprecated");
    }
}
