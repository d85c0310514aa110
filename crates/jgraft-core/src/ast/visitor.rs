use super::{AstKind, JavaAst, NodeId};
use std::fmt::Write as _;

/// Callbacks for [`JavaAst::traverse`]
///
/// Every kind has a `visit_*` hook called before the node's children and an
/// `end_visit_*` hook called after them. All hooks default to doing nothing.
#[allow(unused_variables)]
pub trait AstVisitor {
    fn visit_compilation_unit(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_compilation_unit(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_type(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_type(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_field(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_field(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_initializer(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_initializer(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_method(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_method(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_argument(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_argument(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_local(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_local(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_statement(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_statement(&mut self, ast: &JavaAst, id: NodeId) {}

    fn visit_annotation(&mut self, ast: &JavaAst, id: NodeId) {}
    fn end_visit_annotation(&mut self, ast: &JavaAst, id: NodeId) {}
}

pub(super) fn dispatch<V: AstVisitor + ?Sized>(ast: &JavaAst, id: NodeId, visitor: &mut V) {
    let kind = ast.kind(id);
    match kind {
        AstKind::CompilationUnit => visitor.visit_compilation_unit(ast, id),
        AstKind::Type => visitor.visit_type(ast, id),
        AstKind::Field => visitor.visit_field(ast, id),
        AstKind::Initializer => visitor.visit_initializer(ast, id),
        AstKind::Method => visitor.visit_method(ast, id),
        AstKind::Argument => visitor.visit_argument(ast, id),
        AstKind::Local => visitor.visit_local(ast, id),
        AstKind::Statement => visitor.visit_statement(ast, id),
        AstKind::Annotation => visitor.visit_annotation(ast, id),
    }

    for child in ast.down(id) {
        dispatch(ast, *child, visitor);
    }

    match kind {
        AstKind::CompilationUnit => visitor.end_visit_compilation_unit(ast, id),
        AstKind::Type => visitor.end_visit_type(ast, id),
        AstKind::Field => visitor.end_visit_field(ast, id),
        AstKind::Initializer => visitor.end_visit_initializer(ast, id),
        AstKind::Method => visitor.end_visit_method(ast, id),
        AstKind::Argument => visitor.end_visit_argument(ast, id),
        AstKind::Local => visitor.end_visit_local(ast, id),
        AstKind::Statement => visitor.end_visit_statement(ast, id),
        AstKind::Annotation => visitor.end_visit_annotation(ast, id),
    }
}

/// Prints an indented outline, one line per node
#[derive(Debug, Default)]
pub struct DumpVisitor {
    depth: usize,
    output: String,
}

impl DumpVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn open(&mut self, ast: &JavaAst, id: NodeId) {
        let host = ast.host(id);
        let _ = write!(
            self.output,
            "{}{} {}",
            "  ".repeat(self.depth),
            ast.kind(id),
            host.kind_name()
        );
        if let Some(name) = ast.name(id).filter(|_| ast.kind(id) != AstKind::Statement) {
            let _ = write!(self.output, " {name}");
        }
        if ast.is_changed(id) {
            self.output.push_str(" *");
        }
        self.output.push('\n');
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl AstVisitor for DumpVisitor {
    fn visit_compilation_unit(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_compilation_unit(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
        tracing::debug!("Graph outline:\n{}", self.output);
    }

    fn visit_type(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_type(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_field(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_field(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_initializer(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_initializer(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_method(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_method(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_argument(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_argument(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_local(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_local(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_statement(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_statement(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }

    fn visit_annotation(&mut self, ast: &JavaAst, id: NodeId) {
        self.open(ast, id);
    }
    fn end_visit_annotation(&mut self, _ast: &JavaAst, _id: NodeId) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::JavaParser;

    #[derive(Default)]
    struct Counter {
        opened: Vec<AstKind>,
        closed: usize,
    }

    impl AstVisitor for Counter {
        fn visit_method(&mut self, ast: &JavaAst, id: NodeId) {
            self.opened.push(ast.kind(id));
        }
        fn visit_argument(&mut self, ast: &JavaAst, id: NodeId) {
            self.opened.push(ast.kind(id));
        }
        fn end_visit_method(&mut self, _ast: &JavaAst, _id: NodeId) {
            self.closed += 1;
        }
    }

    fn build(src: &str) -> JavaAst {
        let parsed = JavaParser::new().unwrap().parse("Dump.java", src).unwrap();
        JavaAst::build(&parsed.unit).unwrap()
    }

    #[test]
    fn test_visitor_order() {
        let ast = build("class A { void f(int a, int b) {} abstract void g(); }");
        let mut counter = Counter::default();
        ast.traverse(&mut counter);
        assert_eq!(
            counter.opened,
            vec![
                AstKind::Method,
                AstKind::Argument,
                AstKind::Argument,
                AstKind::Method
            ]
        );
        assert_eq!(counter.closed, 2);
    }

    #[test]
    fn test_dump_outline() {
        let ast = build("class A {\n\t@Deprecated\n\tint x = y;\n}\n");
        assert_eq!(
            ast.dump(),
            "COMPILATION_UNIT CompilationUnit Dump.java\n\
             \x20 TYPE ClassDecl A\n\
             \x20   FIELD VariableDecl x\n\
             \x20     ANNOTATION Annotation\n\
             \x20     STATEMENT Ident\n"
        );
    }
}
