//! Reporting diagnostics against wrapper nodes

use jgraft_core::host::{DiagnosticHost, DiagnosticKind};
use jgraft_core::{DiagnosticLog, JavaAst, JavaParser};

const SOURCE: &str = "class A {\n\tint x;\n\tvoid f() {\n\t}\n}\n";

fn build() -> JavaAst {
    let parsed = JavaParser::new().unwrap().parse("A.java", SOURCE).unwrap();
    JavaAst::build(&parsed.unit).unwrap()
}

#[test]
fn test_error_drops_stale_queued_diagnostics() {
    let ast = build();
    let class = ast.down(ast.top())[0];
    let method = ast.down(class)[1];

    let log = DiagnosticLog::new();
    log.use_source(Some("A.java".to_string()));
    log.defer(DiagnosticKind::Error, "inside f", Some(20));
    log.defer(DiagnosticKind::Warning, "on x", Some(11));
    log.use_source(Some("Driver".to_string()));

    ast.add_error(&log, method, "f was regenerated");

    let deferred = log.deferred();
    assert_eq!(deferred.len(), 1);
    assert_eq!(deferred[0].message, "on x");

    let emitted = log.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].source.as_deref(), Some("A.java"));
    assert_eq!(log.error_count(), Some(1));
    assert!(!log.multiple_errors());
    assert_eq!(log.current_source().as_deref(), Some("Driver"));
}

#[test]
fn test_host_keeps_collapsing_its_own_repeats() {
    let ast = build();
    let class = ast.down(ast.top())[0];
    let field = ast.down(class)[0];

    let log = DiagnosticLog::new();
    ast.add_error(&log, field, "gen");
    log.emit(DiagnosticKind::Error, "host", Some(99));
    log.emit(DiagnosticKind::Error, "host again", Some(99));

    assert!(!log.multiple_errors());
    assert_eq!(log.emitted().len(), 2);
}

#[test]
fn test_warning_leaves_queue_alone() {
    let ast = build();
    let class = ast.down(ast.top())[0];

    let log = DiagnosticLog::new();
    log.defer(DiagnosticKind::Error, "queued", Some(12));
    ast.add_warning(&log, class, "check this class");

    assert_eq!(log.deferred().len(), 1);
    assert_eq!(log.emitted()[0].kind, DiagnosticKind::Warning);
    assert_eq!(log.error_count(), Some(0));
}

#[test]
fn test_host_without_queue_or_counter() {
    let ast = build();
    let class = ast.down(ast.top())[0];

    let log = DiagnosticLog::without_capabilities();
    ast.add_error(&log, class, "still reported");
    ast.add_error(&log, class, "same position");

    assert_eq!(log.emitted().len(), 2);
    assert_eq!(log.error_count(), None);
}
