//! Splicing replacement subtrees through the graph and printing the result

use jgraft_core::ast::{AstKind, JavaAst};
use jgraft_core::host::{Block, Flags, MethodDecl};
use jgraft_core::{Session, Tree, TreeKind, TreeMaker};
use std::rc::Rc;

const SOURCE: &str = "class Counter {
	int value;

	void tick() {
		before();
		value++; // count
		after();
	}
}
";

fn method_body(method: &Tree) -> Vec<Tree> {
    let kind = method.kind();
    let TreeKind::MethodDecl(MethodDecl { body: Some(body), .. }) = &*kind else {
        panic!("not a method with a body");
    };
    let body_kind = body.kind();
    let TreeKind::Block(Block { stats, .. }) = &*body_kind else {
        panic!("body is not a block");
    };
    stats.trees()
}

#[test]
fn test_replace_statement_keeps_siblings() -> anyhow::Result<()> {
    let mut session = Session::with_defaults()?;
    let parsed = session.parse("Counter.java", SOURCE)?;
    let mut ast = JavaAst::build(&parsed.unit)?;

    let class = ast.down(ast.top())[0];
    let tick = ast.down(class)[1];
    let before = method_body(ast.host(tick));
    let target = ast.down(tick)[1];
    assert!(Rc::ptr_eq(ast.host(target), &before[1]));

    let m = TreeMaker::new();
    let reset = m.exec(m.assign(m.ident("value"), m.int_literal(0)));
    let new_id = ast.replace(target, &reset)?;

    let after = method_body(ast.host(tick));
    assert_eq!(after.len(), 3);
    assert!(Rc::ptr_eq(&after[0], &before[0]));
    assert!(Rc::ptr_eq(&after[1], &reset));
    assert!(Rc::ptr_eq(&after[2], &before[2]));

    assert_eq!(ast.kind(new_id), AstKind::Statement);
    assert!(ast.is_changed(tick));
    assert!(!ast.is_changed(ast.down(class)[0]));
    session.mark_changed(ast.compilation_unit());
    assert!(session.is_changed(&parsed.unit));

    let printed = session.print_to_string(&parsed.unit)?;
    assert!(printed.contains("value = 0;"), "{printed}");
    assert!(!printed.contains("value++"), "{printed}");
    assert!(printed.contains("// count"), "{printed}");
    assert!(printed.contains("after();"), "{printed}");
    Ok(())
}

#[test]
fn test_add_synthesized_method() -> anyhow::Result<()> {
    let mut session = Session::with_defaults()?;
    let parsed = session.parse("Counter.java", SOURCE)?;
    let mut ast = JavaAst::build(&parsed.unit)?;
    let class = ast.down(ast.top())[0];

    let m = TreeMaker::new();
    let getter = m.method_def(
        m.modifiers(Flags::PUBLIC, vec![]),
        "getValue",
        Some(m.primitive(jgraft_core::host::PrimitiveKind::Int)),
        vec![],
        vec![],
        vec![],
        Some(m.block(vec![m.return_stat(Some(m.ident("value")))])),
        None,
    );

    // host first, then the wrapper
    let class_host = ast.host(class).clone();
    {
        let mut kind = class_host.kind_mut();
        let TreeKind::ClassDecl(decl) = &mut *kind else {
            panic!("not a class");
        };
        decl.defs = decl.defs.append(getter.clone());
    }
    let added = ast.add(class, &getter, AstKind::Method)?;

    assert!(added.is_some());
    assert_eq!(ast.down(class).len(), 3);
    assert!(ast.is_changed(ast.top()));

    let printed = session.print_to_string(&parsed.unit)?;
    assert!(printed.contains("public int getValue() {"), "{printed}");
    assert!(printed.contains("return value;"), "{printed}");
    Ok(())
}

#[test]
fn test_replace_root_is_rejected() -> anyhow::Result<()> {
    let mut session = Session::with_defaults()?;
    let parsed = session.parse("Counter.java", SOURCE)?;
    let mut ast = JavaAst::build(&parsed.unit)?;
    let err = ast
        .replace(ast.top(), &TreeMaker::new().ident("x"))
        .unwrap_err();
    assert_eq!(err.kind(), jgraft_core::ErrorKind::Structural);
    Ok(())
}

#[test]
fn test_rejected_replacement_leaves_host_untouched() -> anyhow::Result<()> {
    let mut session = Session::with_defaults()?;
    let parsed = session.parse("Counter.java", SOURCE)?;
    let mut ast = JavaAst::build(&parsed.unit)?;
    let original = session.print_to_string(&parsed.unit)?;

    let class = ast.down(ast.top())[0];
    let field = ast.down(class)[0];
    let m = TreeMaker::new();
    let err = ast.replace(field, &m.exec(m.ident("oops"))).unwrap_err();
    assert_eq!(err.kind(), jgraft_core::ErrorKind::Structural);

    assert_eq!(ast.kind(ast.down(class)[0]), AstKind::Field);
    assert_eq!(ast.host(field).kind_name(), "VariableDecl");
    assert!(!ast.is_changed(class));
    let printed = session.print_to_string(&parsed.unit)?;
    assert!(!printed.contains("oops"), "{printed}");
    assert_eq!(
        jgraft_core::printer::normalize(&printed),
        jgraft_core::printer::normalize(&original)
    );
    Ok(())
}
