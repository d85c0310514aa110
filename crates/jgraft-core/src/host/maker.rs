//! Constructors for synthesized host nodes
//!
//! Code generators build replacement subtrees with a [`TreeMaker`]. Nodes are
//! created without a source span unless the maker was positioned with
//! [`TreeMaker::at`].

use super::flags::Flags;
use super::list::NodeList;
use super::ops::{BinaryOp, LiteralKind, PrimitiveKind, UnaryOp};
use super::tree::*;
use biome_text_size::TextRange;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeMaker {
    pos: Option<TextRange>,
}

impl TreeMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A maker whose nodes all carry `span`
    pub fn at(span: TextRange) -> Self {
        Self { pos: Some(span) }
    }

    fn make(&self, kind: impl Into<TreeKind>) -> Tree {
        JTree::with_span(kind, self.pos)
    }

    pub fn ident(&self, name: &str) -> Tree {
        self.make(Ident {
            name: name.to_string(),
        })
    }

    pub fn select(&self, selected: Tree, name: &str) -> Tree {
        self.make(FieldAccess {
            selected,
            name: name.to_string(),
        })
    }

    /// `a.b.c` as nested selects
    pub fn qualified(&self, dotted: &str) -> Tree {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        parts.fold(self.ident(first), |selected, part| {
            self.select(selected, part)
        })
    }

    pub fn literal(&self, kind: LiteralKind, value: &str) -> Tree {
        self.make(Literal {
            kind,
            value: value.to_string(),
        })
    }

    pub fn string_literal(&self, value: &str) -> Tree {
        self.literal(LiteralKind::String, value)
    }

    pub fn int_literal(&self, value: i64) -> Tree {
        self.literal(LiteralKind::Int, &value.to_string())
    }

    pub fn null_literal(&self) -> Tree {
        self.literal(LiteralKind::Null, "null")
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> Tree {
        self.make(PrimitiveType { kind })
    }

    pub fn array_type(&self, elemtype: Tree) -> Tree {
        self.make(ArrayType { elemtype })
    }

    pub fn type_apply(&self, clazz: Tree, arguments: Vec<Tree>) -> Tree {
        self.make(TypeApply {
            clazz,
            arguments: NodeList::from_trees(arguments),
        })
    }

    pub fn apply(&self, typeargs: Vec<Tree>, meth: Tree, args: Vec<Tree>) -> Tree {
        self.make(MethodInvocation {
            typeargs: NodeList::from_trees(typeargs),
            meth,
            args: NodeList::from_trees(args),
        })
    }

    pub fn new_class(&self, clazz: Tree, args: Vec<Tree>, def: Option<Tree>) -> Tree {
        self.make(NewClass {
            encl: None,
            typeargs: NodeList::new(),
            clazz,
            args: NodeList::from_trees(args),
            def,
        })
    }

    pub fn parens(&self, expr: Tree) -> Tree {
        self.make(Parens { expr })
    }

    pub fn assign(&self, lhs: Tree, rhs: Tree) -> Tree {
        self.make(Assign { lhs, rhs })
    }

    pub fn binary(&self, op: BinaryOp, lhs: Tree, rhs: Tree) -> Tree {
        self.make(Binary { op, lhs, rhs })
    }

    pub fn unary(&self, op: UnaryOp, arg: Tree) -> Tree {
        self.make(Unary { op, arg })
    }

    pub fn conditional(&self, cond: Tree, true_part: Tree, false_part: Tree) -> Tree {
        self.make(Conditional {
            cond,
            true_part,
            false_part,
        })
    }

    pub fn type_cast(&self, clazz: Tree, expr: Tree) -> Tree {
        self.make(TypeCast { clazz, expr })
    }

    pub fn exec(&self, expr: Tree) -> Tree {
        self.make(ExpressionStatement { expr })
    }

    pub fn block(&self, stats: Vec<Tree>) -> Tree {
        self.make(Block {
            flags: Flags::empty(),
            stats: NodeList::from_trees(stats),
        })
    }

    pub fn return_stat(&self, expr: Option<Tree>) -> Tree {
        self.make(Return { expr })
    }

    pub fn throw_stat(&self, expr: Tree) -> Tree {
        self.make(Throw { expr })
    }

    pub fn if_stat(&self, cond: Tree, then_part: Tree, else_part: Option<Tree>) -> Tree {
        self.make(If {
            cond,
            then_part,
            else_part,
        })
    }

    pub fn modifiers(&self, flags: Flags, annotations: Vec<Tree>) -> Tree {
        self.make(Modifiers {
            flags,
            annotations: NodeList::from_trees(annotations),
        })
    }

    /// Annotation; `args` are usually built with [`TreeMaker::assign`]
    pub fn annotation(&self, annotation_type: Tree, args: Vec<Tree>) -> Tree {
        self.make(Annotation {
            annotation_type,
            args: NodeList::from_trees(args),
        })
    }

    pub fn var_def(&self, mods: Tree, name: &str, vartype: Tree, init: Option<Tree>) -> Tree {
        self.make(VariableDecl {
            mods,
            name: name.to_string(),
            vartype: Some(vartype),
            init,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn method_def(
        &self,
        mods: Tree,
        name: &str,
        restype: Option<Tree>,
        typarams: Vec<Tree>,
        params: Vec<Tree>,
        thrown: Vec<Tree>,
        body: Option<Tree>,
        default_value: Option<Tree>,
    ) -> Tree {
        self.make(MethodDecl {
            mods,
            name: name.to_string(),
            restype,
            typarams: NodeList::from_trees(typarams),
            params: NodeList::from_trees(params),
            thrown: NodeList::from_trees(thrown),
            body,
            default_value,
        })
    }

    pub fn class_def(
        &self,
        mods: Tree,
        name: &str,
        extending: Option<Tree>,
        implementing: Vec<Tree>,
        defs: Vec<Tree>,
    ) -> Tree {
        self.make(ClassDecl {
            mods,
            name: name.to_string(),
            typarams: NodeList::new(),
            extending,
            implementing: NodeList::from_trees(implementing),
            defs: NodeList::from_trees(defs),
        })
    }

    pub fn erroneous(&self, text: &str) -> Tree {
        self.make(Erroneous {
            errs: NodeList::new(),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biome_text_size::TextSize;

    #[test]
    fn test_qualified_builds_selects() {
        let maker = TreeMaker::new();
        let tree = maker.qualified("java.util.List");
        let kind = tree.kind();
        let TreeKind::FieldAccess(select) = &*kind else {
            panic!("expected a select, got {}", kind.name());
        };
        assert_eq!(select.name, "List");
        assert_eq!(select.selected.kind_name(), "FieldAccess");
    }

    #[test]
    fn test_positioned_maker() {
        let span = TextRange::new(TextSize::from(3), TextSize::from(9));
        let tree = TreeMaker::at(span).ident("x");
        assert_eq!(tree.span(), Some(span));
        assert_eq!(TreeMaker::new().ident("x").span(), None);
    }
}
