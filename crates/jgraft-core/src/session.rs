//! Compilation session
//!
//! A [`Session`] owns everything that outlives a single tree walk: the
//! parser, the comment side table, the diagnostic log, and the set of units a
//! code generator has touched. Units themselves belong to the caller.

use crate::ast::JavaAst;
use crate::comments::{CaptureStrategy, CommentCatcher, CommentCollector, CommentToken, scan_comments};
use crate::config::JGraftConfiguration;
use crate::frontend::{JavaParser, ParsedUnit};
use crate::host::{DiagnosticHost, DiagnosticKind, DiagnosticLog, JTree, Tree};
use crate::printer::{self, PrinterOptions};
use crate::{Result, ResultExt};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

pub struct Session {
    config: JGraftConfiguration,
    parser: JavaParser,
    catcher: CommentCatcher,
    log: DiagnosticLog,
    printer_options: PrinterOptions,
    changed: RefCell<HashMap<usize, Weak<JTree>>>,
}

impl Session {
    pub fn new(config: JGraftConfiguration) -> Result<Self> {
        let printer_options = PrinterOptions::from(&config.printer());
        Ok(Self {
            parser: JavaParser::new()?,
            catcher: CommentCatcher::new(),
            log: DiagnosticLog::new(),
            printer_options,
            changed: RefCell::new(HashMap::new()),
            config,
        })
    }

    /// Session with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(JGraftConfiguration::default())
    }

    pub fn config(&self) -> &JGraftConfiguration {
        &self.config
    }

    pub fn capture_strategy(&self) -> CaptureStrategy {
        self.config.capture_strategy()
    }

    /// Whether annotations consumed by a code generator should be removed
    pub fn delete_annotations(&self) -> bool {
        self.config.delete_annotations()
    }

    pub fn printer_options(&self) -> &PrinterOptions {
        &self.printer_options
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Parse one compilation unit and capture its comments
    ///
    /// Syntax errors do not fail the parse; they are queued on the
    /// diagnostic log against `file_name`.
    pub fn parse(&mut self, file_name: &str, source: &str) -> Result<ParsedUnit> {
        let (parsed, comments) = match self.config.capture_strategy() {
            CaptureStrategy::TreeExtras => {
                let mut collector = CommentCollector::new(source);
                let parsed = self
                    .parser
                    .parse_with_listener(file_name, source, &mut collector)?;
                (parsed, collector.finish())
            }
            CaptureStrategy::LexicalScan => {
                let parsed = self.parser.parse(file_name, source)?;
                (parsed, scan_comments(source))
            }
        };

        debug!(
            "Parsed {} with {} comments",
            file_name,
            comments.len()
        );
        self.catcher.set_comments(&parsed.unit, Some(comments));

        if parsed.has_errors() {
            let previous = self.log.use_source(Some(file_name.to_string()));
            for error in &parsed.syntax_errors {
                self.log.defer(
                    DiagnosticKind::Error,
                    &error.message,
                    Some(u32::from(error.range.start())),
                );
            }
            self.log.use_source(previous);
        }

        Ok(parsed)
    }

    /// Comments captured for `unit`, empty if it was not parsed here
    pub fn comments(&self, unit: &Tree) -> Rc<[CommentToken]> {
        self.catcher.comments(unit)
    }

    /// Drop the captured comments of `unit`
    pub fn forget_comments(&self, unit: &Tree) {
        self.catcher.set_comments(unit, None);
    }

    /// Build the node graph of `unit`
    pub fn ast(&self, unit: &Tree) -> Result<JavaAst> {
        JavaAst::build(unit)
    }

    /// Build the node graphs of several units
    ///
    /// A unit whose graph fails with a recoverable error is skipped (`None`)
    /// and the remaining units are still built.
    pub fn asts(&self, units: &[Tree]) -> Result<Vec<Option<JavaAst>>> {
        units
            .iter()
            .map(|unit| JavaAst::build(unit).recoverable())
            .collect()
    }

    pub fn print<W: Write>(&self, unit: &Tree, sink: &mut W) -> Result<()> {
        let comments = self.catcher.comments(unit);
        printer::print_with_options(unit, &comments, &self.printer_options, sink)
    }

    pub fn print_to_string(&self, unit: &Tree) -> Result<String> {
        let comments = self.catcher.comments(unit);
        printer::print_to_string(unit, &comments, &self.printer_options)
    }

    /// Record that a code generator modified `unit`
    pub fn mark_changed(&self, unit: &Tree) {
        let mut changed = self.changed.borrow_mut();
        changed.retain(|_, entry| entry.strong_count() > 0);
        if changed
            .insert(Rc::as_ptr(unit) as usize, Rc::downgrade(unit))
            .is_none()
        {
            info!("Marked {} as changed", unit_name(unit));
        }
    }

    pub fn is_changed(&self, unit: &Tree) -> bool {
        self.changed
            .borrow()
            .get(&(Rc::as_ptr(unit) as usize))
            .and_then(Weak::upgrade)
            .is_some_and(|stored| Rc::ptr_eq(&stored, unit))
    }

    /// Changed units that are still alive, ordered by source file name
    pub fn changed_units(&self) -> Vec<Tree> {
        let mut units: Vec<Tree> = self
            .changed
            .borrow()
            .values()
            .filter_map(Weak::upgrade)
            .collect();
        units.sort_by_key(unit_name);
        units
    }

    /// Print every changed unit; a unit that fails to print is logged and left out
    pub fn print_changed(&self) -> Vec<(Tree, String)> {
        self.changed_units()
            .into_iter()
            .filter_map(|unit| {
                let text = self.print_to_string(&unit).log_and_continue()?;
                Some((unit, text))
            })
            .collect()
    }
}

fn unit_name(unit: &Tree) -> String {
    match &*unit.kind() {
        crate::host::TreeKind::CompilationUnit(cu) => cu.source_file.clone(),
        other => other.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommentsConfiguration;

    const SOURCE: &str = "package p;\n\n// greeting\nclass A {\n\tint x; // x\n}\n";

    #[test]
    fn test_parse_captures_comments() {
        let mut session = Session::with_defaults().unwrap();
        let parsed = session.parse("A.java", SOURCE).unwrap();
        let comments = session.comments(&parsed.unit);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "// greeting");

        session.forget_comments(&parsed.unit);
        assert!(session.comments(&parsed.unit).is_empty());
    }

    #[test]
    fn test_strategies_agree() {
        let config = JGraftConfiguration {
            comments: Some(CommentsConfiguration {
                strategy: Some(CaptureStrategy::LexicalScan),
            }),
            ..Default::default()
        };
        let mut lexical = Session::new(config).unwrap();
        let mut extras = Session::with_defaults().unwrap();

        let a = lexical.parse("A.java", SOURCE).unwrap();
        let b = extras.parse("A.java", SOURCE).unwrap();
        assert_eq!(&*lexical.comments(&a.unit), &*extras.comments(&b.unit));
    }

    #[test]
    fn test_syntax_errors_are_deferred() {
        let mut session = Session::with_defaults().unwrap();
        session.parse("Broken.java", "class A { int = ; }").unwrap();
        let deferred = session.diagnostics().deferred();
        assert!(!deferred.is_empty());
        assert_eq!(deferred[0].source.as_deref(), Some("Broken.java"));
        assert_eq!(session.diagnostics().current_source(), None);
    }

    #[test]
    fn test_changed_units_are_weak() {
        let mut session = Session::with_defaults().unwrap();
        let kept = session.parse("A.java", "class A {\n}\n").unwrap().unit;
        {
            let dropped = session.parse("B.java", "class B {\n}\n").unwrap().unit;
            session.mark_changed(&dropped);
            assert!(session.is_changed(&dropped));
        }
        assert!(!session.is_changed(&kept));
        session.mark_changed(&kept);
        assert_eq!(session.changed_units().len(), 1);
    }

    #[test]
    fn test_asts_skip_units_that_fail_to_build() {
        let mut session = Session::with_defaults().unwrap();
        let unit = session.parse("A.java", "class A {\n}\n").unwrap().unit;
        let stray = crate::host::TreeMaker::new().block(vec![]);

        let asts = session.asts(&[stray, unit]).unwrap();
        assert!(asts[0].is_none());
        let ast = asts[1].as_ref().unwrap();
        assert_eq!(ast.source_name(), "A.java");
    }

    #[test]
    fn test_print_changed_in_name_order() {
        let mut session = Session::with_defaults().unwrap();
        let b = session.parse("B.java", "class B {\n}\n").unwrap().unit;
        let a = session.parse("A.java", "class A {\n}\n").unwrap().unit;
        let untouched = session.parse("C.java", "class C {\n}\n").unwrap().unit;
        session.mark_changed(&b);
        session.mark_changed(&a);

        let printed = session.print_changed();
        assert_eq!(printed.len(), 2);
        assert!(Rc::ptr_eq(&printed[0].0, &a));
        assert!(printed[0].1.contains("class A {"));
        assert!(printed[1].1.contains("class B {"));
        assert!(!session.is_changed(&untouched));
    }

    #[test]
    fn test_print_uses_captured_comments() {
        let mut session = Session::with_defaults().unwrap();
        let parsed = session.parse("A.java", "class A {\n\t// body\n\tint x;\n}\n").unwrap();
        let text = session.print_to_string(&parsed.unit).unwrap();
        assert!(text.contains("// body"));
        assert!(session.delete_annotations());
    }
}
