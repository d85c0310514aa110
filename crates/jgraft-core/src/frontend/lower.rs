//! Lowering from the tree-sitter concrete syntax tree to the host model
//!
//! Lowering never fails: a construct the host model has no node for becomes
//! an `Erroneous` node that keeps its source text. Every produced node gets
//! the byte range of the concrete node it came from, except synthesized
//! helpers (implicit enum types, the `value` key of a single annotation
//! argument) which carry no span.

use super::{is_comment, text_range, unescape};
use crate::host::*;
use tree_sitter::Node;

pub(super) struct Lowerer<'s> {
    source: &'s str,
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children without comments
fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(child.kind()))
        .collect()
}

fn fields<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node).into_iter().find(|child| child.kind() == kind)
}

fn has_token(node: Node<'_>, kind: &str) -> bool {
    children(node).iter().any(|child| child.kind() == kind)
}

fn is_annotation(kind: &str) -> bool {
    kind == "annotation" || kind == "marker_annotation"
}

fn bracket_count(dims: Node<'_>) -> usize {
    children(dims).iter().filter(|child| child.kind() == "[").count()
}

fn empty_modifiers() -> Tree {
    JTree::new(Modifiers {
        flags: Flags::empty(),
        annotations: NodeList::new(),
    })
}

impl<'s> Lowerer<'s> {
    pub(super) fn new(source: &'s str) -> Self {
        Self { source }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn make(&self, node: Node<'_>, kind: impl Into<TreeKind>) -> Tree {
        JTree::with_span(kind, Some(text_range(node.start_byte(), node.end_byte())))
    }

    fn make_between(&self, start: usize, end: usize, kind: impl Into<TreeKind>) -> Tree {
        JTree::with_span(kind, Some(text_range(start, end)))
    }

    fn erroneous(&self, node: Node<'_>) -> Tree {
        tracing::trace!("Lowering {} as erroneous", node.kind());
        self.make(
            node,
            Erroneous {
                errs: NodeList::new(),
                text: self.text(node).to_string(),
            },
        )
    }

    fn ident(&self, node: Node<'_>) -> Tree {
        self.make(
            node,
            Ident {
                name: self.text(node).to_string(),
            },
        )
    }

    pub(super) fn unit(&self, root: Node<'_>, file_name: &str) -> Tree {
        let mut package = None;
        let mut defs = Vec::new();
        for child in named(root) {
            match child.kind() {
                "package_declaration" => package = Some(self.package(child)),
                "import_declaration" => defs.push(self.import(child)),
                _ => self.members(child, &mut defs),
            }
        }
        self.make(
            root,
            CompilationUnit {
                package,
                defs: NodeList::from_trees(defs),
                source_file: file_name.to_string(),
            },
        )
    }

    fn package(&self, node: Node<'_>) -> Tree {
        let mut annotations = Vec::new();
        let mut pid = None;
        for child in named(node) {
            if is_annotation(child.kind()) {
                annotations.push(self.annotation(child));
            } else {
                pid = Some(self.name_expr(child));
            }
        }
        match pid {
            Some(pid) => self.make(
                node,
                PackageDecl {
                    annotations: NodeList::from_trees(annotations),
                    pid,
                },
            ),
            None => self.erroneous(node),
        }
    }

    fn import(&self, node: Node<'_>) -> Tree {
        let is_static = has_token(node, "static");
        let parts = named(node);
        let Some(name) = parts
            .iter()
            .find(|part| part.kind() == "identifier" || part.kind() == "scoped_identifier")
        else {
            return self.erroneous(node);
        };
        let mut qualid = self.name_expr(*name);
        if let Some(star) = parts.iter().find(|part| part.kind() == "asterisk") {
            qualid = self.make_between(
                name.start_byte(),
                star.end_byte(),
                FieldAccess {
                    selected: qualid,
                    name: "*".to_string(),
                },
            );
        }
        self.make(node, Import { qualid, is_static })
    }

    /// `a.b.c` names in package, import and annotation positions
    fn name_expr(&self, node: Node<'_>) -> Tree {
        match node.kind() {
            "scoped_identifier" => {
                let (Some(scope), Some(name)) = (
                    node.child_by_field_name("scope"),
                    node.child_by_field_name("name"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    FieldAccess {
                        selected: self.name_expr(scope),
                        name: self.text(name).to_string(),
                    },
                )
            }
            _ => self.expr(node),
        }
    }

    // ---- declarations ----

    fn modifiers(&self, owner: Node<'_>, implied: Flags) -> Tree {
        let Some(mods) = child_of_kind(owner, "modifiers") else {
            return JTree::new(Modifiers {
                flags: implied,
                annotations: NodeList::new(),
            });
        };
        let mut flags = implied;
        let mut annotations = Vec::new();
        for child in children(mods) {
            if is_annotation(child.kind()) {
                annotations.push(self.annotation(child));
            } else if let Some(flag) = Flags::from_keyword(child.kind()) {
                flags |= flag;
            }
        }
        self.make(
            mods,
            Modifiers {
                flags,
                annotations: NodeList::from_trees(annotations),
            },
        )
    }

    /// Class body members; one declaration may yield several fields
    fn members(&self, node: Node<'_>, out: &mut Vec<Tree>) {
        match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration" => out.push(self.type_decl(node)),
            "field_declaration" | "constant_declaration" => out.extend(self.declarations(node)),
            "method_declaration" => out.push(self.method(node)),
            "constructor_declaration" => out.push(self.constructor(node)),
            "annotation_type_element_declaration" => out.push(self.annotation_element(node)),
            "block" => out.push(self.block(node, Flags::empty())),
            "static_initializer" => match child_of_kind(node, "block") {
                Some(body) => {
                    let block = self.block(body, Flags::STATIC);
                    block.set_span(Some(text_range(node.start_byte(), node.end_byte())));
                    out.push(block);
                }
                None => out.push(self.erroneous(node)),
            },
            _ => out.push(self.erroneous(node)),
        }
    }

    fn body_members(&self, body: Node<'_>) -> NodeList {
        let mut defs = Vec::new();
        for child in named(body) {
            self.members(child, &mut defs);
        }
        NodeList::from_trees(defs)
    }

    fn type_decl(&self, node: Node<'_>) -> Tree {
        let implied = match node.kind() {
            "interface_declaration" => Flags::INTERFACE,
            "annotation_type_declaration" => Flags::INTERFACE | Flags::ANNOTATION,
            "enum_declaration" => Flags::ENUM,
            _ => Flags::empty(),
        };
        let mods = self.modifiers(node, implied);
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let typarams = node
            .child_by_field_name("type_parameters")
            .map(|t| self.type_parameters(t))
            .unwrap_or_default();

        let extending = node
            .child_by_field_name("superclass")
            .and_then(|sup| named(sup).into_iter().next())
            .map(|ty| self.expr(ty));

        let implementing = node
            .child_by_field_name("interfaces")
            .or_else(|| child_of_kind(node, "extends_interfaces"))
            .and_then(|clause| child_of_kind(clause, "type_list"))
            .map(|list| NodeList::from_trees(named(list).into_iter().map(|ty| self.expr(ty))))
            .unwrap_or_default();

        let defs = match node.child_by_field_name("body") {
            Some(body) if body.kind() == "enum_body" => self.enum_body(body, &name),
            Some(body) => self.body_members(body),
            None => NodeList::new(),
        };

        self.make(
            node,
            ClassDecl {
                mods,
                name,
                typarams,
                extending,
                implementing,
                defs,
            },
        )
    }

    fn enum_body(&self, body: Node<'_>, enum_name: &str) -> NodeList {
        let mut defs = Vec::new();
        for child in named(body) {
            match child.kind() {
                "enum_constant" => defs.push(self.enum_constant(child, enum_name)),
                "enum_body_declarations" => {
                    for member in named(child) {
                        self.members(member, &mut defs);
                    }
                }
                _ => defs.push(self.erroneous(child)),
            }
        }
        NodeList::from_trees(defs)
    }

    fn enum_constant(&self, node: Node<'_>, enum_name: &str) -> Tree {
        let mods = self.modifiers(
            node,
            Flags::PUBLIC | Flags::STATIC | Flags::FINAL | Flags::ENUM,
        );
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.arguments(a))
            .unwrap_or_default();
        let def = node.child_by_field_name("body").map(|body| {
            self.make(
                body,
                ClassDecl {
                    mods: empty_modifiers(),
                    name: String::new(),
                    typarams: NodeList::new(),
                    extending: None,
                    implementing: NodeList::new(),
                    defs: self.body_members(body),
                },
            )
        });
        let enum_type = || {
            JTree::new(Ident {
                name: enum_name.to_string(),
            })
        };
        let init = self.make(
            node,
            NewClass {
                encl: None,
                typeargs: NodeList::new(),
                clazz: enum_type(),
                args,
                def,
            },
        );
        self.make(
            node,
            VariableDecl {
                mods,
                name,
                vartype: Some(enum_type()),
                init: Some(init),
            },
        )
    }

    /// Field or local declaration; one variable per declarator
    ///
    /// The declarators share the modifiers and the declared type. Each
    /// variable starts where the declaration starts; the last one also owns
    /// the terminating semicolon.
    fn declarations(&self, node: Node<'_>) -> Vec<Tree> {
        let mods = self.modifiers(node, Flags::empty());
        let Some(ty) = node.child_by_field_name("type") else {
            return vec![self.erroneous(node)];
        };
        let vartype = self.expr(ty);
        let declarators = fields(node, "declarator");
        let last = declarators.len().saturating_sub(1);

        declarators
            .iter()
            .enumerate()
            .map(|(i, declarator)| {
                let end = if i == last {
                    node.end_byte()
                } else {
                    declarator.end_byte()
                };
                let vartype = match declarator.child_by_field_name("dimensions") {
                    Some(dims) => self.with_dims(vartype.clone(), dims),
                    None => vartype.clone(),
                };
                let init = declarator
                    .child_by_field_name("value")
                    .map(|value| self.initializer(value));
                self.make_between(
                    node.start_byte(),
                    end,
                    VariableDecl {
                        mods: mods.clone(),
                        name: declarator
                            .child_by_field_name("name")
                            .map(|n| self.text(n).to_string())
                            .unwrap_or_default(),
                        vartype: Some(vartype),
                        init,
                    },
                )
            })
            .collect()
    }

    fn initializer(&self, node: Node<'_>) -> Tree {
        match node.kind() {
            "array_initializer" => self.array_initializer(node),
            _ => self.expr(node),
        }
    }

    fn method(&self, node: Node<'_>) -> Tree {
        let mods = self.modifiers(node, Flags::empty());
        let restype = node.child_by_field_name("type").map(|ty| {
            let base = self.expr(ty);
            match node.child_by_field_name("dimensions") {
                Some(dims) => self.with_dims(base, dims),
                None => base,
            }
        });
        let body = node
            .child_by_field_name("body")
            .map(|body| self.block(body, Flags::empty()));
        self.make(
            node,
            MethodDecl {
                mods,
                name: self.field_text(node, "name"),
                restype,
                typarams: self.method_type_parameters(node),
                params: self.formal_parameters(node),
                thrown: self.throws(node),
                body,
                default_value: None,
            },
        )
    }

    fn constructor(&self, node: Node<'_>) -> Tree {
        let mods = self.modifiers(node, Flags::empty());
        let body = node
            .child_by_field_name("body")
            .map(|body| self.block(body, Flags::empty()));
        self.make(
            node,
            MethodDecl {
                mods,
                name: MethodDecl::CONSTRUCTOR_NAME.to_string(),
                restype: None,
                typarams: self.method_type_parameters(node),
                params: self.formal_parameters(node),
                thrown: self.throws(node),
                body,
                default_value: None,
            },
        )
    }

    fn annotation_element(&self, node: Node<'_>) -> Tree {
        let mods = self.modifiers(node, Flags::empty());
        let restype = node.child_by_field_name("type").map(|ty| self.expr(ty));
        let default_value = node
            .child_by_field_name("value")
            .map(|value| self.element_value(value));
        self.make(
            node,
            MethodDecl {
                mods,
                name: self.field_text(node, "name"),
                restype,
                typarams: NodeList::new(),
                params: NodeList::new(),
                thrown: NodeList::new(),
                body: None,
                default_value,
            },
        )
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    fn method_type_parameters(&self, node: Node<'_>) -> NodeList {
        node.child_by_field_name("type_parameters")
            .map(|t| self.type_parameters(t))
            .unwrap_or_default()
    }

    fn throws(&self, node: Node<'_>) -> NodeList {
        child_of_kind(node, "throws")
            .map(|clause| NodeList::from_trees(named(clause).into_iter().map(|ty| self.expr(ty))))
            .unwrap_or_default()
    }

    fn formal_parameters(&self, owner: Node<'_>) -> NodeList {
        let Some(params) = owner.child_by_field_name("parameters") else {
            return NodeList::new();
        };
        let mut out = Vec::new();
        for param in named(params) {
            match param.kind() {
                "formal_parameter" => out.push(self.formal_parameter(param)),
                "spread_parameter" => out.push(self.spread_parameter(param)),
                "receiver_parameter" => {}
                _ => out.push(self.erroneous(param)),
            }
        }
        NodeList::from_trees(out)
    }

    fn formal_parameter(&self, node: Node<'_>) -> Tree {
        let mods = self.modifiers(node, Flags::empty());
        let vartype = node.child_by_field_name("type").map(|ty| {
            let base = self.expr(ty);
            match node.child_by_field_name("dimensions") {
                Some(dims) => self.with_dims(base, dims),
                None => base,
            }
        });
        self.make(
            node,
            VariableDecl {
                mods,
                name: self.field_text(node, "name"),
                vartype,
                init: None,
            },
        )
    }

    /// `T... name`, stored as an array-typed parameter flagged as varargs
    fn spread_parameter(&self, node: Node<'_>) -> Tree {
        let mods = self.modifiers(node, Flags::VARARGS);
        let parts = named(node);
        let element = parts
            .iter()
            .find(|part| part.kind() != "modifiers" && part.kind() != "variable_declarator");
        let declarator = parts
            .iter()
            .find(|part| part.kind() == "variable_declarator");
        let (Some(element), Some(declarator)) = (element, declarator) else {
            return self.erroneous(node);
        };
        let elemtype = self.expr(*element);
        let vartype = JTree::new(ArrayType { elemtype });
        self.make(
            node,
            VariableDecl {
                mods,
                name: self.field_text(*declarator, "name"),
                vartype: Some(vartype),
                init: None,
            },
        )
    }

    fn type_parameters(&self, node: Node<'_>) -> NodeList {
        named(node)
            .into_iter()
            .filter(|param| param.kind() == "type_parameter")
            .map(|param| {
                let name = named(param)
                    .into_iter()
                    .find(|part| part.kind() == "type_identifier" || part.kind() == "identifier")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let bounds = child_of_kind(param, "type_bound")
                    .map(|bound| NodeList::from_trees(named(bound).into_iter().map(|ty| self.expr(ty))))
                    .unwrap_or_default();
                self.make(param, TypeParameter { name, bounds })
            })
            .collect()
    }

    fn annotation(&self, node: Node<'_>) -> Tree {
        let Some(name) = node.child_by_field_name("name") else {
            return self.erroneous(node);
        };
        let annotation_type = self.name_expr(name);
        let args = node
            .child_by_field_name("arguments")
            .map(|list| {
                let items = named(list);
                if items.iter().all(|item| item.kind() == "element_value_pair") {
                    NodeList::from_trees(items.into_iter().map(|pair| self.element_value_pair(pair)))
                } else {
                    // a lone value is shorthand for `value = ...`
                    let value = items
                        .into_iter()
                        .next()
                        .map(|item| self.element_value(item))
                        .map(|rhs| {
                            JTree::new(Assign {
                                lhs: JTree::new(Ident {
                                    name: "value".to_string(),
                                }),
                                rhs,
                            })
                        });
                    NodeList::from_trees(value)
                }
            })
            .unwrap_or_default();
        self.make(
            node,
            Annotation {
                annotation_type,
                args,
            },
        )
    }

    fn element_value_pair(&self, node: Node<'_>) -> Tree {
        let (Some(key), Some(value)) = (
            node.child_by_field_name("key"),
            node.child_by_field_name("value"),
        ) else {
            return self.erroneous(node);
        };
        self.make(
            node,
            Assign {
                lhs: self.ident(key),
                rhs: self.element_value(value),
            },
        )
    }

    fn element_value(&self, node: Node<'_>) -> Tree {
        match node.kind() {
            "element_value_array_initializer" => self.make(
                node,
                NewArray {
                    elemtype: None,
                    dims: NodeList::new(),
                    elems: Some(NodeList::from_trees(
                        named(node).into_iter().map(|item| self.element_value(item)),
                    )),
                },
            ),
            kind if is_annotation(kind) => self.annotation(node),
            _ => self.expr(node),
        }
    }

    // ---- statements ----

    fn block(&self, node: Node<'_>, flags: Flags) -> Tree {
        self.make(
            node,
            Block {
                flags,
                stats: NodeList::from_trees(self.statements(node)),
            },
        )
    }

    fn statements(&self, node: Node<'_>) -> Vec<Tree> {
        let mut stats = Vec::new();
        for child in children(node) {
            if is_comment(child.kind()) || !(child.is_named() || child.kind() == ";") {
                continue;
            }
            match child.kind() {
                "local_variable_declaration" => stats.extend(self.declarations(child)),
                _ => stats.push(self.stat(child)),
            }
        }
        stats
    }

    fn stat(&self, node: Node<'_>) -> Tree {
        match node.kind() {
            "block" => self.block(node, Flags::empty()),
            ";" => self.make(node, Skip),
            "expression_statement" => match named(node).into_iter().next() {
                Some(expr) => self.make(node, ExpressionStatement { expr: self.expr(expr) }),
                None => self.erroneous(node),
            },
            "labeled_statement" => {
                let parts = named(node);
                match (parts.first(), parts.last()) {
                    (Some(label), Some(body)) if parts.len() == 2 => self.make(
                        node,
                        LabeledStatement {
                            label: self.text(*label).to_string(),
                            body: self.stat(*body),
                        },
                    ),
                    _ => self.erroneous(node),
                }
            }
            "if_statement" => {
                let (Some(cond), Some(then_part)) = (
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("consequence"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    If {
                        cond: self.expr(cond),
                        then_part: self.stat(then_part),
                        else_part: node
                            .child_by_field_name("alternative")
                            .map(|alt| self.stat(alt)),
                    },
                )
            }
            "while_statement" => {
                let (Some(cond), Some(body)) = (
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("body"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    WhileLoop {
                        cond: self.expr(cond),
                        body: self.stat(body),
                    },
                )
            }
            "do_statement" => {
                let (Some(body), Some(cond)) = (
                    node.child_by_field_name("body"),
                    node.child_by_field_name("condition"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    DoWhileLoop {
                        body: self.stat(body),
                        cond: self.expr(cond),
                    },
                )
            }
            "for_statement" => self.for_loop(node),
            "enhanced_for_statement" => self.enhanced_for(node),
            "break_statement" => self.make(
                node,
                Break {
                    label: self.label(node),
                },
            ),
            "continue_statement" => self.make(
                node,
                Continue {
                    label: self.label(node),
                },
            ),
            "return_statement" => self.make(
                node,
                Return {
                    expr: named(node).into_iter().next().map(|e| self.expr(e)),
                },
            ),
            "throw_statement" => match named(node).into_iter().next() {
                Some(expr) => self.make(node, Throw { expr: self.expr(expr) }),
                None => self.erroneous(node),
            },
            "assert_statement" => {
                let parts = named(node);
                match parts.first() {
                    Some(cond) => self.make(
                        node,
                        Assert {
                            cond: self.expr(*cond),
                            detail: parts.get(1).map(|d| self.expr(*d)),
                        },
                    ),
                    None => self.erroneous(node),
                }
            }
            "synchronized_statement" => {
                let lock = child_of_kind(node, "parenthesized_expression");
                let body = node.child_by_field_name("body");
                let (Some(lock), Some(body)) = (lock, body) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    Synchronized {
                        lock: self.expr(lock),
                        body: self.block(body, Flags::empty()),
                    },
                )
            }
            "try_statement" | "try_with_resources_statement" => self.try_stat(node),
            "switch_expression" => self.switch(node),
            "local_variable_declaration" => {
                let mut vars = self.declarations(node);
                if vars.len() == 1 {
                    vars.remove(0)
                } else {
                    self.erroneous(node)
                }
            }
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration" => self.type_decl(node),
            "explicit_constructor_invocation" => self.constructor_call(node),
            _ => self.erroneous(node),
        }
    }

    fn label(&self, node: Node<'_>) -> Option<String> {
        named(node)
            .into_iter()
            .find(|part| part.kind() == "identifier")
            .map(|label| self.text(label).to_string())
    }

    /// Initializers and updates of a `for` header are expression statements
    fn expr_stat(&self, node: Node<'_>) -> Tree {
        self.make(node, ExpressionStatement { expr: self.expr(node) })
    }

    fn for_loop(&self, node: Node<'_>) -> Tree {
        let Some(body) = node.child_by_field_name("body") else {
            return self.erroneous(node);
        };
        let mut init = Vec::new();
        for item in fields(node, "init") {
            match item.kind() {
                "local_variable_declaration" => init.extend(self.declarations(item)),
                _ => init.push(self.expr_stat(item)),
            }
        }
        let step = fields(node, "update")
            .into_iter()
            .map(|item| self.expr_stat(item));
        self.make(
            node,
            ForLoop {
                init: NodeList::from_trees(init),
                cond: node.child_by_field_name("condition").map(|c| self.expr(c)),
                step: NodeList::from_trees(step),
                body: self.stat(body),
            },
        )
    }

    fn enhanced_for(&self, node: Node<'_>) -> Tree {
        let (Some(ty), Some(name), Some(value), Some(body)) = (
            node.child_by_field_name("type"),
            node.child_by_field_name("name"),
            node.child_by_field_name("value"),
            node.child_by_field_name("body"),
        ) else {
            return self.erroneous(node);
        };
        let mods = self.modifiers(node, Flags::empty());
        let start = mods.start().map(usize::from).unwrap_or(ty.start_byte());
        let mut vartype = self.expr(ty);
        if let Some(dims) = node.child_by_field_name("dimensions") {
            vartype = self.with_dims(vartype, dims);
        }
        let var = self.make_between(
            start,
            name.end_byte(),
            VariableDecl {
                mods,
                name: self.text(name).to_string(),
                vartype: Some(vartype),
                init: None,
            },
        );
        self.make(
            node,
            EnhancedForLoop {
                var,
                expr: self.expr(value),
                body: self.stat(body),
            },
        )
    }

    fn try_stat(&self, node: Node<'_>) -> Tree {
        let Some(body) = node.child_by_field_name("body") else {
            return self.erroneous(node);
        };
        let resources = node
            .child_by_field_name("resources")
            .map(|spec| {
                NodeList::from_trees(
                    named(spec)
                        .into_iter()
                        .filter(|r| r.kind() == "resource")
                        .map(|r| self.resource(r)),
                )
            })
            .unwrap_or_default();

        let mut catchers = Vec::new();
        let mut finalizer = None;
        for child in named(node) {
            match child.kind() {
                "catch_clause" => catchers.push(self.catch_clause(child)),
                "finally_clause" => {
                    finalizer = child_of_kind(child, "block").map(|b| self.block(b, Flags::empty()));
                }
                _ => {}
            }
        }

        self.make(
            node,
            Try {
                resources,
                body: self.block(body, Flags::empty()),
                catchers: NodeList::from_trees(catchers),
                finalizer,
            },
        )
    }

    fn resource(&self, node: Node<'_>) -> Tree {
        match (
            node.child_by_field_name("type"),
            node.child_by_field_name("name"),
        ) {
            (Some(ty), Some(name)) => {
                let mut vartype = self.expr(ty);
                if let Some(dims) = node.child_by_field_name("dimensions") {
                    vartype = self.with_dims(vartype, dims);
                }
                self.make(
                    node,
                    VariableDecl {
                        mods: self.modifiers(node, Flags::empty()),
                        name: self.text(name).to_string(),
                        vartype: Some(vartype),
                        init: node.child_by_field_name("value").map(|v| self.expr(v)),
                    },
                )
            }
            _ => match named(node).into_iter().next() {
                Some(expr) => self.expr(expr),
                None => self.erroneous(node),
            },
        }
    }

    fn catch_clause(&self, node: Node<'_>) -> Tree {
        let param = child_of_kind(node, "catch_formal_parameter");
        let body = node.child_by_field_name("body");
        let (Some(param), Some(body)) = (param, body) else {
            return self.erroneous(node);
        };

        let vartype = child_of_kind(param, "catch_type").map(|catch_type| {
            let alternatives: Vec<Tree> =
                named(catch_type).into_iter().map(|ty| self.expr(ty)).collect();
            if alternatives.len() == 1 {
                alternatives.into_iter().next().unwrap_or_else(|| self.erroneous(catch_type))
            } else {
                self.make(
                    catch_type,
                    TypeUnion {
                        alternatives: NodeList::from_trees(alternatives),
                    },
                )
            }
        });
        let param = self.make(
            param,
            VariableDecl {
                mods: self.modifiers(param, Flags::empty()),
                name: self.field_text(param, "name"),
                vartype,
                init: None,
            },
        );
        self.make(
            node,
            Catch {
                param,
                body: self.block(body, Flags::empty()),
            },
        )
    }

    fn switch(&self, node: Node<'_>) -> Tree {
        let (Some(selector), Some(body)) = (
            node.child_by_field_name("condition"),
            node.child_by_field_name("body"),
        ) else {
            return self.erroneous(node);
        };
        let mut cases = Vec::new();
        for group in named(body) {
            match group.kind() {
                "switch_block_statement_group" => self.case_group(group, &mut cases),
                _ => cases.push(self.erroneous(group)),
            }
        }
        self.make(
            node,
            Switch {
                selector: self.expr(selector),
                cases: NodeList::from_trees(cases),
            },
        )
    }

    /// One case per label; the statements belong to the last label of the group
    fn case_group(&self, group: Node<'_>, cases: &mut Vec<Tree>) {
        let mut labels = Vec::new();
        let mut body = Vec::new();
        for child in named(group) {
            if child.kind() == "switch_label" {
                labels.push(child);
            } else {
                body.push(child);
            }
        }
        let last = labels.len().saturating_sub(1);
        for (i, label) in labels.iter().enumerate() {
            let pats = if has_token(*label, "default") {
                NodeList::new()
            } else {
                NodeList::from_trees(named(*label).into_iter().map(|pat| self.expr(pat)))
            };
            let mut stats = Vec::new();
            let mut end = label.end_byte();
            if i == last {
                for stat in &body {
                    match stat.kind() {
                        "local_variable_declaration" => stats.extend(self.declarations(*stat)),
                        _ => stats.push(self.stat(*stat)),
                    }
                }
                end = group.end_byte();
            }
            cases.push(self.make_between(
                label.start_byte(),
                end,
                Case {
                    pats,
                    stats: NodeList::from_trees(stats),
                },
            ));
        }
    }

    /// `this(...)`, `super(...)` or `outer.super(...)` as an expression statement
    fn constructor_call(&self, node: Node<'_>) -> Tree {
        let (Some(ctor), Some(arguments)) = (
            node.child_by_field_name("constructor"),
            node.child_by_field_name("arguments"),
        ) else {
            return self.erroneous(node);
        };
        let ctor_name = self.text(ctor).to_string();
        let meth = match node.child_by_field_name("object") {
            Some(object) => self.make_between(
                object.start_byte(),
                ctor.end_byte(),
                FieldAccess {
                    selected: self.expr(object),
                    name: ctor_name,
                },
            ),
            None => self.make(ctor, Ident { name: ctor_name }),
        };
        let call = self.make_between(
            node.start_byte(),
            arguments.end_byte(),
            MethodInvocation {
                typeargs: self.type_arguments_field(node),
                meth,
                args: self.arguments(arguments),
            },
        );
        self.make(node, ExpressionStatement { expr: call })
    }

    // ---- expressions and types ----

    fn arguments(&self, node: Node<'_>) -> NodeList {
        NodeList::from_trees(named(node).into_iter().map(|arg| self.expr(arg)))
    }

    fn type_arguments(&self, node: Node<'_>) -> NodeList {
        NodeList::from_trees(named(node).into_iter().map(|arg| self.expr(arg)))
    }

    fn type_arguments_field(&self, node: Node<'_>) -> NodeList {
        node.child_by_field_name("type_arguments")
            .map(|args| self.type_arguments(args))
            .unwrap_or_default()
    }

    fn array_initializer(&self, node: Node<'_>) -> Tree {
        self.make(
            node,
            NewArray {
                elemtype: None,
                dims: NodeList::new(),
                elems: Some(NodeList::from_trees(
                    named(node).into_iter().map(|item| self.initializer(item)),
                )),
            },
        )
    }

    /// Wrap `base` in one array type per `[]` pair of `dims`
    fn with_dims(&self, base: Tree, dims: Node<'_>) -> Tree {
        self.wrap_array(base, bracket_count(dims))
    }

    fn wrap_array(&self, base: Tree, count: usize) -> Tree {
        (0..count).fold(base, |elemtype, _| JTree::new(ArrayType { elemtype }))
    }

    fn literal(&self, node: Node<'_>, kind: LiteralKind, value: String) -> Tree {
        self.make(node, Literal { kind, value })
    }

    pub(super) fn expr(&self, node: Node<'_>) -> Tree {
        let text = self.text(node);
        match node.kind() {
            "identifier" | "type_identifier" | "this" | "super" => self.ident(node),
            "scoped_identifier" => self.name_expr(node),

            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => {
                let kind = if text.ends_with(['l', 'L']) {
                    LiteralKind::Long
                } else {
                    LiteralKind::Int
                };
                self.literal(node, kind, text.to_string())
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                let kind = if text.ends_with(['f', 'F']) {
                    LiteralKind::Float
                } else {
                    LiteralKind::Double
                };
                self.literal(node, kind, text.to_string())
            }
            "true" | "false" => self.literal(node, LiteralKind::Boolean, text.to_string()),
            "null_literal" => self.literal(node, LiteralKind::Null, text.to_string()),
            "character_literal" => {
                let body = text
                    .strip_prefix('\'')
                    .and_then(|t| t.strip_suffix('\''))
                    .unwrap_or(text);
                self.literal(node, LiteralKind::Char, unescape(body))
            }
            // text blocks keep their layout verbatim
            "string_literal" if text.starts_with("\"\"\"") => self.erroneous(node),
            "string_literal" => {
                let body = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text);
                self.literal(node, LiteralKind::String, unescape(body))
            }

            "parenthesized_expression" => match named(node).into_iter().next() {
                Some(inner) => self.make(node, Parens { expr: self.expr(inner) }),
                None => self.erroneous(node),
            },
            "assignment_expression" => self.assignment(node),
            "binary_expression" => {
                let (Some(lhs), Some(op), Some(rhs)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("right"),
                ) else {
                    return self.erroneous(node);
                };
                match BinaryOp::from_symbol(self.text(op)) {
                    Some(op) => self.make(
                        node,
                        Binary {
                            op,
                            lhs: self.expr(lhs),
                            rhs: self.expr(rhs),
                        },
                    ),
                    None => self.erroneous(node),
                }
            }
            "unary_expression" => {
                let (Some(op), Some(arg)) = (
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("operand"),
                ) else {
                    return self.erroneous(node);
                };
                match UnaryOp::prefix_from_symbol(self.text(op)) {
                    Some(op) => self.make(node, Unary { op, arg: self.expr(arg) }),
                    None => self.erroneous(node),
                }
            }
            "update_expression" => {
                let parts = children(node);
                let prefix = parts.first().is_some_and(|first| !first.is_named());
                let op_text = parts
                    .iter()
                    .find(|part| !part.is_named())
                    .map(|part| part.kind())
                    .unwrap_or_default();
                let op = match (prefix, op_text) {
                    (true, "++") => UnaryOp::PreInc,
                    (true, "--") => UnaryOp::PreDec,
                    (false, "++") => UnaryOp::PostInc,
                    (false, "--") => UnaryOp::PostDec,
                    _ => return self.erroneous(node),
                };
                match named(node).into_iter().next() {
                    Some(arg) => self.make(node, Unary { op, arg: self.expr(arg) }),
                    None => self.erroneous(node),
                }
            }
            "instanceof_expression" => {
                let (Some(lhs), Some(rhs)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) else {
                    return self.erroneous(node);
                };
                if node.child_by_field_name("name").is_some() {
                    return self.erroneous(node);
                }
                self.make(
                    node,
                    InstanceOf {
                        expr: self.expr(lhs),
                        clazz: self.expr(rhs),
                    },
                )
            }
            "ternary_expression" => {
                let (Some(cond), Some(true_part), Some(false_part)) = (
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("consequence"),
                    node.child_by_field_name("alternative"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    Conditional {
                        cond: self.expr(cond),
                        true_part: self.expr(true_part),
                        false_part: self.expr(false_part),
                    },
                )
            }
            "cast_expression" => {
                let types = fields(node, "type");
                let (Some(ty), Some(value)) = (types.first(), node.child_by_field_name("value"))
                else {
                    return self.erroneous(node);
                };
                if types.len() > 1 {
                    return self.erroneous(node);
                }
                self.make(
                    node,
                    TypeCast {
                        clazz: self.expr(*ty),
                        expr: self.expr(value),
                    },
                )
            }
            "lambda_expression" => self.lambda(node),
            "method_invocation" => self.invocation(node),
            "object_creation_expression" => self.new_class(node),
            "field_access" => {
                let (Some(object), Some(field)) = (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("field"),
                ) else {
                    return self.erroneous(node);
                };
                let selected = self.qualified_super(node, object);
                self.make(
                    node,
                    FieldAccess {
                        selected,
                        name: self.text(field).to_string(),
                    },
                )
            }
            "array_access" => {
                let (Some(array), Some(index)) = (
                    node.child_by_field_name("array"),
                    node.child_by_field_name("index"),
                ) else {
                    return self.erroneous(node);
                };
                self.make(
                    node,
                    ArrayAccess {
                        indexed: self.expr(array),
                        index: self.expr(index),
                    },
                )
            }
            "method_reference" => self.member_reference(node),
            "array_creation_expression" => self.new_array(node),
            "array_initializer" => self.array_initializer(node),
            "class_literal" => match named(node).into_iter().next() {
                Some(ty) => self.make(
                    node,
                    FieldAccess {
                        selected: self.expr(ty),
                        name: "class".to_string(),
                    },
                ),
                None => self.erroneous(node),
            },
            "switch_expression" => self.switch(node),

            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                match PrimitiveKind::from_keyword(text.trim()) {
                    Some(kind) => self.make(node, PrimitiveType { kind }),
                    None => self.erroneous(node),
                }
            }
            "scoped_type_identifier" => {
                let parts: Vec<_> = named(node)
                    .into_iter()
                    .filter(|part| !is_annotation(part.kind()))
                    .collect();
                match (parts.first(), parts.last()) {
                    (Some(qualifier), Some(name)) if parts.len() >= 2 => self.make(
                        node,
                        FieldAccess {
                            selected: self.expr(*qualifier),
                            name: self.text(*name).to_string(),
                        },
                    ),
                    _ => self.erroneous(node),
                }
            }
            "generic_type" => {
                let parts = named(node);
                let clazz = parts.iter().find(|part| part.kind() != "type_arguments");
                let args = parts.iter().find(|part| part.kind() == "type_arguments");
                match clazz {
                    Some(clazz) => self.make(
                        node,
                        TypeApply {
                            clazz: self.expr(*clazz),
                            arguments: args.map(|a| self.type_arguments(*a)).unwrap_or_default(),
                        },
                    ),
                    None => self.erroneous(node),
                }
            }
            "array_type" => {
                let (Some(element), Some(dims)) = (
                    node.child_by_field_name("element"),
                    node.child_by_field_name("dimensions"),
                ) else {
                    return self.erroneous(node);
                };
                let tree = self.with_dims(self.expr(element), dims);
                tree.set_span(Some(text_range(node.start_byte(), node.end_byte())));
                tree
            }
            "wildcard" => {
                let kind = if has_token(node, "extends") {
                    BoundKind::Extends
                } else if has_token(node, "super") {
                    BoundKind::Super
                } else {
                    BoundKind::Unbound
                };
                let inner = match kind {
                    BoundKind::Unbound => None,
                    _ => named(node)
                        .into_iter()
                        .rfind(|part| !is_annotation(part.kind()) && part.kind() != "super")
                        .map(|ty| self.expr(ty)),
                };
                self.make(node, Wildcard { kind, inner })
            }
            "annotated_type" => match named(node)
                .into_iter()
                .rfind(|part| !is_annotation(part.kind()))
            {
                Some(ty) => self.expr(ty),
                None => self.erroneous(node),
            },
            kind if is_annotation(kind) => self.annotation(node),
            _ => self.erroneous(node),
        }
    }

    fn assignment(&self, node: Node<'_>) -> Tree {
        let (Some(lhs), Some(op), Some(rhs)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return self.erroneous(node);
        };
        let lhs = self.expr(lhs);
        let rhs = self.initializer(rhs);
        match self.text(op) {
            "=" => self.make(node, Assign { lhs, rhs }),
            symbol => match BinaryOp::from_assign_symbol(symbol) {
                Some(op) => self.make(node, AssignOp { op, lhs, rhs }),
                None => self.erroneous(node),
            },
        }
    }

    /// Selected expression of a select, with the `Outer.super` form folded in
    fn qualified_super(&self, node: Node<'_>, object: Node<'_>) -> Tree {
        let selected = self.expr(object);
        let inner_super = named(node)
            .into_iter()
            .find(|part| part.kind() == "super" && part.start_byte() > object.start_byte());
        match inner_super {
            Some(sup) => self.make_between(
                object.start_byte(),
                sup.end_byte(),
                FieldAccess {
                    selected,
                    name: "super".to_string(),
                },
            ),
            None => selected,
        }
    }

    fn invocation(&self, node: Node<'_>) -> Tree {
        let (Some(name), Some(arguments)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("arguments"),
        ) else {
            return self.erroneous(node);
        };
        let meth = match node.child_by_field_name("object") {
            Some(object) => self.make_between(
                object.start_byte(),
                name.end_byte(),
                FieldAccess {
                    selected: self.qualified_super(node, object),
                    name: self.text(name).to_string(),
                },
            ),
            None => self.ident(name),
        };
        self.make(
            node,
            MethodInvocation {
                typeargs: self.type_arguments_field(node),
                meth,
                args: self.arguments(arguments),
            },
        )
    }

    fn new_class(&self, node: Node<'_>) -> Tree {
        let (Some(ty), Some(arguments)) = (
            node.child_by_field_name("type"),
            node.child_by_field_name("arguments"),
        ) else {
            return self.erroneous(node);
        };
        let qualified = children(node).first().is_some_and(|first| first.kind() != "new");
        let encl = if qualified {
            named(node).into_iter().next().map(|outer| self.expr(outer))
        } else {
            None
        };
        let def = child_of_kind(node, "class_body").map(|body| {
            self.make(
                body,
                ClassDecl {
                    mods: empty_modifiers(),
                    name: String::new(),
                    typarams: NodeList::new(),
                    extending: None,
                    implementing: NodeList::new(),
                    defs: self.body_members(body),
                },
            )
        });
        self.make(
            node,
            NewClass {
                encl,
                typeargs: self.type_arguments_field(node),
                clazz: self.expr(ty),
                args: self.arguments(arguments),
                def,
            },
        )
    }

    fn new_array(&self, node: Node<'_>) -> Tree {
        let Some(ty) = node.child_by_field_name("type") else {
            return self.erroneous(node);
        };
        let base = self.expr(ty);
        let mut dims = Vec::new();
        let mut brackets = 0;
        for dim in fields(node, "dimensions") {
            match dim.kind() {
                "dimensions_expr" => {
                    if let Some(size) = named(dim)
                        .into_iter()
                        .rfind(|part| !is_annotation(part.kind()))
                    {
                        dims.push(self.expr(size));
                    }
                }
                "dimensions" => brackets += bracket_count(dim),
                _ => {}
            }
        }
        let elems = node.child_by_field_name("value").map(|init| {
            NodeList::from_trees(named(init).into_iter().map(|item| self.initializer(item)))
        });
        // the `[]` introducing an initializer is printed with the elements
        if elems.is_some() {
            brackets = brackets.saturating_sub(1);
        }
        self.make(
            node,
            NewArray {
                elemtype: Some(self.wrap_array(base, brackets)),
                dims: NodeList::from_trees(dims),
                elems,
            },
        )
    }

    fn lambda(&self, node: Node<'_>) -> Tree {
        let (Some(params), Some(body)) = (
            node.child_by_field_name("parameters"),
            node.child_by_field_name("body"),
        ) else {
            return self.erroneous(node);
        };
        let untyped = |name: Node<'_>| {
            self.make(
                name,
                VariableDecl {
                    mods: empty_modifiers(),
                    name: self.text(name).to_string(),
                    vartype: None,
                    init: None,
                },
            )
        };
        let (style, params) = match params.kind() {
            "identifier" => (LambdaParams::Bare, NodeList::from_trees([untyped(params)])),
            "inferred_parameters" => (
                LambdaParams::Inferred,
                NodeList::from_trees(named(params).into_iter().map(untyped)),
            ),
            _ => (LambdaParams::Explicit, self.formal_parameters(node)),
        };
        let body = match body.kind() {
            "block" => self.block(body, Flags::empty()),
            _ => self.expr(body),
        };
        self.make(
            node,
            Lambda {
                params,
                body,
                style,
            },
        )
    }

    fn member_reference(&self, node: Node<'_>) -> Tree {
        let parts = named(node);
        let Some(target) = parts.first() else {
            return self.erroneous(node);
        };
        let typeargs = parts
            .iter()
            .find(|part| part.kind() == "type_arguments")
            .map(|args| self.type_arguments(*args))
            .unwrap_or_default();
        let name = match children(node).last() {
            Some(last) if last.kind() == "new" => "new".to_string(),
            Some(last) if parts.len() > 1 => self.text(*last).to_string(),
            _ => return self.erroneous(node),
        };
        self.make(
            node,
            MemberReference {
                expr: self.expr(*target),
                typeargs,
                name,
            },
        )
    }
}
