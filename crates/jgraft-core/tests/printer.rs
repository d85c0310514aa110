//! Printer behavior on parsed and synthesized trees

use jgraft_core::comments::scan_comments;
use jgraft_core::host::{
    BinaryOp, CompilationUnit, Flags, JTree, LiteralKind, MethodDecl, NodeList, PrimitiveKind,
};
use jgraft_core::printer::{self, PrinterOptions};
use jgraft_core::{JavaAst, JavaParser, Tree, TreeKind, TreeMaker};

fn options() -> PrinterOptions {
    PrinterOptions::default().with_line_separator("\n")
}

fn reprint(source: &str) -> String {
    let parsed = JavaParser::new().unwrap().parse("Test.java", source).unwrap();
    let comments = scan_comments(source);
    printer::print_to_string(&parsed.unit, &comments, &options()).unwrap()
}

fn flags_of(mods: &Tree) -> Flags {
    match &*mods.kind() {
        TreeKind::Modifiers(mods) => mods.flags,
        _ => Flags::empty(),
    }
}

#[test]
fn test_precedence_from_source() {
    let printed = reprint("class A {\n\tint x = a + b * c;\n\tint y = (a + b) * c;\n}\n");
    assert!(printed.contains("int x = a + b * c;"), "{printed}");
    assert!(printed.contains("int y = (a + b) * c;"), "{printed}");
}

#[test]
fn test_interface_members_hide_implicit_modifiers() {
    let source = "interface Api {\n\tpublic static final int LIMIT = 3;\n\tpublic abstract void call();\n}\n";
    let parsed = JavaParser::new().unwrap().parse("Api.java", source).unwrap();
    let printed = printer::print_to_string(&parsed.unit, &[], &options()).unwrap();
    assert!(printed.contains("\tint LIMIT = 3;"), "{printed}");
    assert!(printed.contains("\tvoid call();"), "{printed}");

    // display only: the host flags still carry the keywords
    let ast = JavaAst::build(&parsed.unit).unwrap();
    let api = ast.down(ast.top())[0];
    let members = ast.down(api);
    let field_flags = match &*ast.host(members[0]).kind() {
        TreeKind::VariableDecl(var) => flags_of(&var.mods),
        _ => Flags::empty(),
    };
    let method_flags = match &*ast.host(members[1]).kind() {
        TreeKind::MethodDecl(method) => flags_of(&method.mods),
        _ => Flags::empty(),
    };
    assert!(field_flags.contains(Flags::PUBLIC | Flags::STATIC | Flags::FINAL));
    assert!(method_flags.contains(Flags::PUBLIC | Flags::ABSTRACT));
}

#[test]
fn test_annotation_arguments() {
    let printed = reprint(
        "class A {\n\t@SuppressWarnings(value = \"unchecked\")\n\tint a;\n\t@Range(min = 1, max = 9)\n\tint b;\n}\n",
    );
    assert!(printed.contains("@SuppressWarnings(\"unchecked\")"), "{printed}");
    assert!(printed.contains("@Range(min = 1, max = 9)"), "{printed}");
}

#[test]
fn test_every_comment_printed_once_in_order() {
    let source = "// head\nclass A { // open\n\t/* a */ int a; /* after a */\n\t// before b\n\tint b;\n} // tail\n";
    let printed = reprint(source);
    let mut last = 0;
    for comment in scan_comments(source) {
        let found: Vec<_> = printed.match_indices(&comment.content).collect();
        assert_eq!(found.len(), 1, "{} in {printed}", comment.content);
        assert!(found[0].0 >= last, "{} out of order in {printed}", comment.content);
        last = found[0].0;
    }
}

#[test]
fn test_synthesized_unit() {
    let m = TreeMaker::new();
    let field = m.var_def(
        m.modifiers(Flags::PRIVATE | Flags::FINAL, vec![]),
        "name",
        m.ident("String"),
        None,
    );
    let getter = m.method_def(
        m.modifiers(Flags::PUBLIC, vec![m.annotation(m.ident("Override"), vec![])]),
        "toString",
        Some(m.ident("String")),
        vec![],
        vec![],
        vec![],
        Some(m.block(vec![m.return_stat(Some(m.ident("name")))])),
        None,
    );
    let check = m.method_def(
        m.modifiers(Flags::empty(), vec![]),
        "positive",
        Some(m.primitive(PrimitiveKind::Boolean)),
        vec![],
        vec![m.var_def(
            m.modifiers(Flags::empty(), vec![]),
            "n",
            m.primitive(PrimitiveKind::Int),
            None,
        )],
        vec![],
        Some(m.block(vec![
            m.if_stat(
                m.binary(BinaryOp::Gt, m.ident("n"), m.int_literal(0)),
                m.return_stat(Some(m.literal(LiteralKind::Boolean, "true"))),
                None,
            ),
            m.return_stat(Some(m.literal(LiteralKind::Boolean, "false"))),
        ])),
        None,
    );
    let class = m.class_def(
        m.modifiers(Flags::PUBLIC, vec![]),
        "Person",
        None,
        vec![],
        vec![field, getter, check],
    );
    let unit: Tree = JTree::new(CompilationUnit {
        package: None,
        defs: NodeList::from_trees([class]),
        source_file: "Person.java".to_string(),
    });

    let printed = printer::print_to_string(&unit, &[], &options().with_indent("  ")).unwrap();
    insta::assert_snapshot!(printer::normalize(&printed).trim_end(), @r"
    public class Person {
      private final String name;
      @Override
      public String toString() {
        return name;
      }
      boolean positive(int n) {
        if (n > 0) return true;
        return false;
      }
    }
    ");
}

fn unit_of(class: Tree) -> Tree {
    JTree::new(CompilationUnit {
        package: None,
        defs: NodeList::from_trees([class]),
        source_file: "Gen.java".to_string(),
    })
}

#[test]
fn test_generated_constructor_is_hidden() {
    let m = TreeMaker::new();
    let implicit = m.method_def(
        m.modifiers(Flags::PUBLIC | Flags::GENERATED_CONSTRUCTOR, vec![]),
        MethodDecl::CONSTRUCTOR_NAME,
        None,
        vec![],
        vec![],
        vec![],
        Some(m.block(vec![m.exec(m.apply(vec![], m.ident("super"), vec![]))])),
        None,
    );
    let run = m.method_def(
        m.modifiers(Flags::empty(), vec![]),
        "run",
        Some(m.primitive(PrimitiveKind::Void)),
        vec![],
        vec![],
        vec![],
        Some(m.block(vec![])),
        None,
    );
    let class = m.class_def(m.modifiers(Flags::empty(), vec![]), "Gen", None, vec![], vec![implicit, run]);

    let printed = printer::print_to_string(&unit_of(class), &[], &options()).unwrap();
    assert!(!printed.contains("Gen("), "{printed}");
    assert!(printed.contains("void run() {"), "{printed}");
}

#[test]
fn test_implicit_super_call_is_hidden() {
    let printed = reprint(
        "class A extends B {\n\tA() {\n\t\tsuper();\n\t}\n\tA(int x) {\n\t\tsuper(x);\n\t}\n}\n",
    );
    assert!(!printed.contains("super();"), "{printed}");
    assert!(printed.contains("super(x);"), "{printed}");
    assert!(printed.contains("A(int x) {"), "{printed}");
}

#[test]
fn test_super_call_with_type_arguments_is_kept() {
    let m = TreeMaker::new();
    let ctor = m.method_def(
        m.modifiers(Flags::empty(), vec![]),
        MethodDecl::CONSTRUCTOR_NAME,
        None,
        vec![],
        vec![],
        vec![],
        Some(m.block(vec![m.exec(m.apply(vec![m.ident("T")], m.ident("super"), vec![]))])),
        None,
    );
    let class = m.class_def(m.modifiers(Flags::empty(), vec![]), "Gen", None, vec![], vec![ctor]);

    let printed = printer::print_to_string(&unit_of(class), &[], &options()).unwrap();
    assert!(printed.contains("<T>super();"), "{printed}");
}

#[test]
fn test_nested_prefix_signs_stay_apart() {
    let printed = reprint(
        "class A {\n\tint y = - -x;\n\tint z = + +x;\n\tint w = - --x;\n\tint v = -~x;\n\tboolean b = !!f;\n}\n",
    );
    assert!(printed.contains("int y = - -x;"), "{printed}");
    assert!(printed.contains("int z = + +x;"), "{printed}");
    assert!(printed.contains("int w = - --x;"), "{printed}");
    assert!(printed.contains("int v = -~x;"), "{printed}");
    assert!(printed.contains("boolean b = !!f;"), "{printed}");
}

#[test]
fn test_failing_sink_is_print_error() {
    struct Closed;
    impl std::io::Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let parsed = JavaParser::new().unwrap().parse("A.java", "class A {\n}\n").unwrap();
    let err = printer::print(&parsed.unit, &[], &mut Closed).unwrap_err();
    assert_eq!(err.kind(), jgraft_core::ErrorKind::Print);
}
