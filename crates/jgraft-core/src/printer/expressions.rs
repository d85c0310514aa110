use super::{Printer, quote};
use crate::host::{
    ArrayAccess, Assign, AssignOp, Binary, Conditional, FieldAccess, InstanceOf, Lambda,
    LambdaParams, Literal, LiteralKind, MemberReference, MethodInvocation, NewArray, NewClass,
    Parens, Tree, TreeKind, TypeCast, Unary, prec,
};
use std::io::{self, Write};

/// Whether `operand` prints starting with the last character of `symbol`
fn starts_with_prefix_sign(operand: &Tree, symbol: &str) -> bool {
    let kind = operand.kind();
    let TreeKind::Unary(inner) = &*kind else {
        return false;
    };
    inner.op.is_prefix()
        && matches!(symbol.chars().last(), Some(sign @ ('+' | '-')) if inner.op.symbol().starts_with(sign))
}

/// Innermost element type of an array type, with the number of `[]` around it
fn array_base(tree: &Tree) -> (Tree, usize) {
    let mut base = tree.clone();
    let mut depth = 0;
    loop {
        let elemtype = match &*base.kind() {
            TreeKind::ArrayType(array) => array.elemtype.clone(),
            _ => break,
        };
        base = elemtype;
        depth += 1;
    }
    (base, depth)
}

impl<W: Write> Printer<'_, W> {
    pub(super) fn visit_conditional(&mut self, expr: &Conditional) -> io::Result<()> {
        let context = self.prec;
        self.open(context, prec::COND)?;
        self.print_expr(&expr.cond, prec::COND)?;
        self.print(" ? ")?;
        self.print_expr(&expr.true_part, prec::COND)?;
        self.print(" : ")?;
        self.print_expr(&expr.false_part, prec::COND)?;
        self.close(context, prec::COND)
    }

    pub(super) fn visit_apply(&mut self, expr: &MethodInvocation) -> io::Result<()> {
        if expr.typeargs.is_empty() {
            self.print_expr(&expr.meth, prec::POSTFIX)?;
        } else {
            // type arguments sit between the receiver and the name
            match expr.meth.kind().clone() {
                TreeKind::FieldAccess(select) => {
                    self.print_expr(&select.selected, prec::POSTFIX)?;
                    self.print(".")?;
                    self.print_type_args(&expr.typeargs)?;
                    self.print(&select.name)?;
                }
                _ => {
                    self.print_type_args(&expr.typeargs)?;
                    self.print_expr(&expr.meth, prec::POSTFIX)?;
                }
            }
        }
        self.print("(")?;
        self.print_exprs(&expr.args)?;
        self.print(")")
    }

    pub(super) fn visit_new_class(&mut self, expr: &NewClass) -> io::Result<()> {
        if let Some(encl) = &expr.encl {
            self.print_expr(encl, prec::POSTFIX)?;
            self.print(".")?;
        }
        self.print("new ")?;
        self.print_type_args(&expr.typeargs)?;
        self.print_expr(&expr.clazz, prec::NONE)?;
        self.print("(")?;
        self.print_exprs(&expr.args)?;
        self.print(")")?;

        let Some(def) = &expr.def else {
            return Ok(());
        };
        let TreeKind::ClassDecl(body) = def.kind().clone() else {
            return self.print_expr(def, prec::NONE);
        };
        self.print(" ")?;
        let name = (!body.name.is_empty()).then(|| body.name.clone());
        let encl_class_name = std::mem::replace(&mut self.encl_class_name, name);
        let in_interface = std::mem::replace(&mut self.in_interface, false);
        let printed = self.print_block(&body.defs, def);
        self.encl_class_name = encl_class_name;
        self.in_interface = in_interface;
        printed
    }

    pub(super) fn visit_new_array(&mut self, expr: &NewArray) -> io::Result<()> {
        if let Some(elemtype) = &expr.elemtype {
            let (base, depth) = array_base(elemtype);
            self.print("new ")?;
            self.print_expr(&base, prec::NONE)?;
            for dim in expr.dims.trees() {
                self.print("[")?;
                self.print_expr(&dim, prec::NONE)?;
                self.print("]")?;
            }
            for _ in 0..depth {
                self.print("[]")?;
            }
        }
        if let Some(elems) = &expr.elems {
            if expr.elemtype.is_some() {
                self.print("[]")?;
            }
            self.print("{")?;
            self.print_exprs(elems)?;
            self.print("}")?;
        }
        Ok(())
    }

    pub(super) fn visit_parens(&mut self, expr: &Parens) -> io::Result<()> {
        self.print("(")?;
        self.print_expr(&expr.expr, prec::NONE)?;
        self.print(")")
    }

    pub(super) fn visit_assign(&mut self, expr: &Assign) -> io::Result<()> {
        let context = self.prec;
        self.open(context, prec::ASSIGN)?;
        self.print_expr(&expr.lhs, prec::ASSIGN + 1)?;
        self.print(" = ")?;
        self.print_expr(&expr.rhs, prec::ASSIGN)?;
        self.close(context, prec::ASSIGN)
    }

    pub(super) fn visit_assign_op(&mut self, expr: &AssignOp) -> io::Result<()> {
        let context = self.prec;
        self.open(context, prec::ASSIGN_OP)?;
        self.print_expr(&expr.lhs, prec::ASSIGN_OP + 1)?;
        self.print(" ")?;
        self.print(expr.op.symbol())?;
        self.print("= ")?;
        self.print_expr(&expr.rhs, prec::ASSIGN_OP)?;
        self.close(context, prec::ASSIGN_OP)
    }

    pub(super) fn visit_unary(&mut self, expr: &Unary) -> io::Result<()> {
        let context = self.prec;
        let own = expr.op.precedence();
        self.open(context, own)?;
        if expr.op.is_prefix() {
            let symbol = expr.op.symbol();
            self.print(symbol)?;
            // `- -x` must not fuse into `--x`
            if starts_with_prefix_sign(&expr.arg, symbol) {
                self.print(" ")?;
            }
            self.print_expr(&expr.arg, own)?;
        } else {
            self.print_expr(&expr.arg, own)?;
            self.print(expr.op.symbol())?;
        }
        self.close(context, own)
    }

    pub(super) fn visit_binary(&mut self, expr: &Binary) -> io::Result<()> {
        let context = self.prec;
        let own = expr.op.precedence();
        self.open(context, own)?;
        self.print_expr(&expr.lhs, own)?;
        self.print(" ")?;
        self.print(expr.op.symbol())?;
        self.print(" ")?;
        self.print_expr(&expr.rhs, own + 1)?;
        self.close(context, own)
    }

    pub(super) fn visit_type_cast(&mut self, expr: &TypeCast) -> io::Result<()> {
        let context = self.prec;
        self.open(context, prec::PREFIX)?;
        self.print("(")?;
        self.print_expr(&expr.clazz, prec::NONE)?;
        self.print(")")?;
        self.print_expr(&expr.expr, prec::PREFIX)?;
        self.close(context, prec::PREFIX)
    }

    pub(super) fn visit_instance_of(&mut self, expr: &InstanceOf) -> io::Result<()> {
        let context = self.prec;
        self.open(context, prec::ORD)?;
        self.print_expr(&expr.expr, prec::ORD)?;
        self.print(" instanceof ")?;
        self.print_expr(&expr.clazz, prec::ORD + 1)?;
        self.close(context, prec::ORD)
    }

    pub(super) fn visit_indexed(&mut self, expr: &ArrayAccess) -> io::Result<()> {
        self.print_expr(&expr.indexed, prec::POSTFIX)?;
        self.print("[")?;
        self.print_expr(&expr.index, prec::NONE)?;
        self.print("]")
    }

    pub(super) fn visit_select(&mut self, expr: &FieldAccess) -> io::Result<()> {
        self.print_expr(&expr.selected, prec::POSTFIX)?;
        self.print(".")?;
        self.print(&expr.name)
    }

    pub(super) fn visit_literal(&mut self, expr: &Literal) -> io::Result<()> {
        match expr.kind {
            LiteralKind::Char => {
                let text = format!("'{}'", quote(&expr.value, '\''));
                self.print(&text)
            }
            LiteralKind::String => {
                let text = format!("\"{}\"", quote(&expr.value, '"'));
                self.print(&text)
            }
            LiteralKind::Null => self.print("null"),
            LiteralKind::Int
            | LiteralKind::Long
            | LiteralKind::Float
            | LiteralKind::Double
            | LiteralKind::Boolean => self.print(&expr.value),
        }
    }

    pub(super) fn visit_lambda(&mut self, expr: &Lambda) -> io::Result<()> {
        match expr.style {
            LambdaParams::Bare => self.print_exprs(&expr.params)?,
            LambdaParams::Inferred => {
                self.print("(")?;
                self.print_exprs(&expr.params)?;
                self.print(")")?;
            }
            LambdaParams::Explicit => {
                self.print("(")?;
                let in_params = std::mem::replace(&mut self.in_params, true);
                let params = self.print_exprs(&expr.params);
                self.in_params = in_params;
                params?;
                self.print(")")?;
            }
        }
        self.print(" -> ")?;
        let in_params = std::mem::replace(&mut self.in_params, false);
        let body = self.print_expr(&expr.body, prec::NONE);
        self.in_params = in_params;
        body
    }

    pub(super) fn visit_reference(&mut self, expr: &MemberReference) -> io::Result<()> {
        self.print_expr(&expr.expr, prec::POSTFIX)?;
        self.print("::")?;
        self.print_type_args(&expr.typeargs)?;
        self.print(&expr.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BinaryOp, TreeMaker};
    use crate::printer::PrinterOptions;

    fn render(tree: &Tree) -> String {
        let options = PrinterOptions::default().with_line_separator("\n");
        let mut out = Vec::new();
        let mut printer = Printer::new(&mut out, &[], &options);
        printer.print_expr(tree, prec::NONE).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_binary_parenthesizes_by_precedence() {
        let m = TreeMaker::new();
        let sum = m.binary(BinaryOp::Plus, m.ident("a"), m.ident("b"));
        let product = m.binary(BinaryOp::Mul, sum, m.ident("c"));
        assert_eq!(render(&product), "(a + b) * c");

        let product = m.binary(BinaryOp::Mul, m.ident("b"), m.ident("c"));
        let sum = m.binary(BinaryOp::Plus, m.ident("a"), product);
        assert_eq!(render(&sum), "a + b * c");
    }

    #[test]
    fn test_right_operand_of_same_precedence() {
        let m = TreeMaker::new();
        let inner = m.binary(BinaryOp::Minus, m.ident("b"), m.ident("c"));
        let outer = m.binary(BinaryOp::Minus, m.ident("a"), inner);
        assert_eq!(render(&outer), "a - (b - c)");
    }

    #[test]
    fn test_cast_and_conditional() {
        let m = TreeMaker::new();
        let sum = m.binary(BinaryOp::Plus, m.ident("a"), m.ident("b"));
        let cast = m.type_cast(m.ident("Long"), sum);
        assert_eq!(render(&cast), "(Long)(a + b)");

        let cond = m.conditional(m.ident("ok"), m.int_literal(1), m.int_literal(2));
        let assign = m.assign(m.ident("x"), cond);
        assert_eq!(render(&assign), "x = ok ? 1 : 2");
    }

    #[test]
    fn test_new_array_with_initializer() {
        let m = TreeMaker::new();
        let tree = crate::host::JTree::new(NewArray {
            elemtype: Some(m.primitive(crate::host::PrimitiveKind::Int)),
            dims: crate::host::NodeList::new(),
            elems: Some(crate::host::NodeList::from_trees([m.int_literal(1), m.int_literal(2)])),
        });
        assert_eq!(render(&tree), "new int[]{1, 2}");
    }

    #[test]
    fn test_literals_are_escaped() {
        let m = TreeMaker::new();
        assert_eq!(render(&m.string_literal("a\"b\n")), "\"a\\\"b\\n\"");
        assert_eq!(render(&m.literal(LiteralKind::Char, "'")), "'\\''");
        assert_eq!(render(&m.null_literal()), "null");
    }
}
