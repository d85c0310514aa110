//! Integration tests for the wrapper graph

use jgraft_core::ast::{AstKind, AstVisitor, JavaAst, NodeId};
use jgraft_core::{JavaParser, Tree};

const SOURCE: &str = "package p;

import java.util.List;

@Deprecated
class Outer {
	@Deprecated int a, b = 2;

	static {
		System.out.println(\"init\");
	}

	Outer(int start) {
		a = start;
	}

	int sum(List<Integer> values) {
		int total = 0;
		for (int v : values) {
			total += v;
		}
		Runnable r = new Runnable() {
			public void run() {
			}
		};
		return total;
	}

	interface Inner {
		void call();
	}
}
";

fn build(source: &str) -> anyhow::Result<(Tree, JavaAst)> {
    let parsed = JavaParser::new()?.parse("Outer.java", source)?;
    let ast = JavaAst::build(&parsed.unit)?;
    Ok((parsed.unit, ast))
}

/// Records type nesting through the type hooks only
#[derive(Default)]
struct TypeNesting {
    names: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl AstVisitor for TypeNesting {
    fn visit_type(&mut self, ast: &JavaAst, id: NodeId) {
        self.names.push(ast.name(id).unwrap_or_default());
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn end_visit_type(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.depth -= 1;
    }
}

#[test]
fn test_members_in_source_order() -> anyhow::Result<()> {
    let (_, ast) = build(SOURCE)?;
    let outer = ast.down(ast.top())[0];
    assert_eq!(ast.name(outer).as_deref(), Some("Outer"));

    let kinds: Vec<_> = ast.down(outer).iter().map(|id| ast.kind(*id)).collect();
    assert_eq!(
        kinds,
        vec![
            AstKind::Annotation,
            AstKind::Field,
            AstKind::Field,
            AstKind::Initializer,
            AstKind::Method,
            AstKind::Method,
            AstKind::Type,
        ]
    );

    let names: Vec<_> = ast.down(outer)[1..]
        .iter()
        .filter_map(|id| ast.name(*id))
        .collect();
    assert_eq!(names, vec!["a", "b", "<init>", "sum", "Inner"]);
    Ok(())
}

#[test]
fn test_every_node_points_back_to_its_parent() -> anyhow::Result<()> {
    let (_, ast) = build(SOURCE)?;
    let mut stack = vec![ast.top()];
    let mut seen = 0;
    while let Some(id) = stack.pop() {
        seen += 1;
        for child in ast.down(id) {
            assert_eq!(ast.up(*child), Some(id));
            stack.push(*child);
        }
    }
    assert_eq!(seen, ast.len());
    assert_eq!(ast.up(ast.top()), None);
    Ok(())
}

#[test]
fn test_anonymous_class_and_locals() -> anyhow::Result<()> {
    let (_, ast) = build(SOURCE)?;
    let outer = ast.down(ast.top())[0];
    let sum = ast.down(outer)[5];
    assert_eq!(ast.kind(sum), AstKind::Method);

    let kinds: Vec<_> = ast.down(sum).iter().map(|id| ast.kind(*id)).collect();
    assert_eq!(kinds[0], AstKind::Argument);
    assert_eq!(kinds[1], AstKind::Local);
    assert_eq!(kinds[2], AstKind::Statement);

    let runnable = ast.down(sum)[3];
    assert_eq!(ast.kind(runnable), AstKind::Local);
    let nested_type = ast
        .down(runnable)
        .iter()
        .flat_map(|id| std::iter::once(*id).chain(ast.down(*id).iter().copied()))
        .find(|id| ast.kind(*id) == AstKind::Type);
    assert!(nested_type.is_some(), "{}", ast.dump());
    Ok(())
}

#[test]
fn test_build_is_idempotent() -> anyhow::Result<()> {
    let (_, mut ast) = build(SOURCE)?;
    let before = ast.len();
    let children = ast.down(ast.top()).to_vec();
    ast.rebuild()?;
    ast.rebuild()?;
    assert_eq!(ast.len(), before);
    assert_eq!(ast.down(ast.top()), children.as_slice());
    Ok(())
}

#[test]
fn test_traversal_follows_source_order() -> anyhow::Result<()> {
    let (_, ast) = build(SOURCE)?;
    let mut nesting = TypeNesting::default();
    ast.traverse(&mut nesting);
    assert_eq!(nesting.names.len(), 3);
    assert_eq!(nesting.names.first().map(String::as_str), Some("Outer"));
    assert_eq!(nesting.names.last().map(String::as_str), Some("Inner"));
    assert_eq!(nesting.max_depth, 2);
    assert_eq!(nesting.depth, 0);

    // one outline line per wrapper
    assert_eq!(ast.dump().lines().count(), ast.len());
    Ok(())
}

#[test]
fn test_each_host_node_has_one_wrapper() -> anyhow::Result<()> {
    let (_, ast) = build(SOURCE)?;
    let mut stack = vec![ast.top()];
    while let Some(id) = stack.pop() {
        assert_eq!(ast.node_for(ast.host(id)), Some(id));
        stack.extend(ast.down(id).iter().copied());
    }
    Ok(())
}
