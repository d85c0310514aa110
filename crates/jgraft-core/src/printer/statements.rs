use super::Printer;
use crate::host::{
    Assert, Block, Case, Catch, DoWhileLoop, EnhancedForLoop, ExpressionStatement, ForLoop, If,
    LabeledStatement, Return, Switch, Synchronized, Throw, Tree, TreeKind, Try, WhileLoop, prec,
};
use std::io::{self, Write};

/// `super()` with no arguments, implied in every constructor
fn is_implicit_super_call(expr: &Tree) -> bool {
    let kind = expr.kind();
    let TreeKind::MethodInvocation(call) = &*kind else {
        return false;
    };
    call.args.is_empty()
        && call.typeargs.is_empty()
        && matches!(&*call.meth.kind(), TreeKind::Ident(ident) if ident.name == "super")
}

impl<W: Write> Printer<'_, W> {
    /// Conditions are parenthesized whether or not the tree holds `Parens`
    fn print_cond(&mut self, cond: &Tree) -> io::Result<()> {
        if cond.kind_name() == "Parens" {
            self.print_expr(cond, prec::NONE)
        } else {
            self.print("(")?;
            self.print_expr(cond, prec::NONE)?;
            self.print(")")
        }
    }

    pub(super) fn visit_block(&mut self, tree: &Tree, block: &Block) -> io::Result<()> {
        self.print_flags(block.flags)?;
        self.print_block(&block.stats, tree)
    }

    pub(super) fn visit_do_while(&mut self, stat: &DoWhileLoop) -> io::Result<()> {
        self.print("do ")?;
        self.print_stat(&stat.body)?;
        self.print(" while ")?;
        self.print_cond(&stat.cond)?;
        self.print(";")
    }

    pub(super) fn visit_while(&mut self, stat: &WhileLoop) -> io::Result<()> {
        self.print("while ")?;
        self.print_cond(&stat.cond)?;
        self.print(" ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_for(&mut self, stat: &ForLoop) -> io::Result<()> {
        self.print("for (")?;
        let init = stat.init.trees();
        if let Some(first) = init.first() {
            if first.kind_name() == "VariableDecl" {
                // later declarators share the first one's modifiers and type
                self.print_expr(first, prec::NONE)?;
                for var in &init[1..] {
                    let TreeKind::VariableDecl(var) = var.kind().clone() else {
                        continue;
                    };
                    self.print(", ")?;
                    self.print(&var.name)?;
                    if let Some(value) = &var.init {
                        self.print(" = ")?;
                        self.print_expr(value, prec::NONE)?;
                    }
                }
            } else {
                self.print_exprs(&stat.init)?;
            }
        }
        self.print(";")?;
        if let Some(cond) = &stat.cond {
            self.print(" ")?;
            self.print_expr(cond, prec::NONE)?;
        }
        self.print(";")?;
        if !stat.step.is_empty() {
            self.print(" ")?;
            self.print_exprs(&stat.step)?;
        }
        self.print(") ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_foreach(&mut self, stat: &EnhancedForLoop) -> io::Result<()> {
        self.print("for (")?;
        self.print_expr(&stat.var, prec::NONE)?;
        self.print(" : ")?;
        self.print_expr(&stat.expr, prec::NONE)?;
        self.print(") ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_labeled(&mut self, stat: &LabeledStatement) -> io::Result<()> {
        self.print(&stat.label)?;
        self.print(": ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_switch(&mut self, stat: &Switch) -> io::Result<()> {
        self.print("switch ")?;
        self.print_cond(&stat.selector)?;
        self.print(" {")?;
        self.println()?;
        self.print_stats(&stat.cases)?;
        self.align()?;
        self.print("}")
    }

    pub(super) fn visit_case(&mut self, stat: &Case) -> io::Result<()> {
        if stat.pats.is_empty() {
            self.print("default")?;
        } else {
            self.print("case ")?;
            self.print_exprs(&stat.pats)?;
        }
        self.print(":")?;
        self.println()?;
        self.indent();
        self.print_stats(&stat.stats)?;
        self.undent();
        Ok(())
    }

    pub(super) fn visit_synchronized(&mut self, stat: &Synchronized) -> io::Result<()> {
        self.print("synchronized ")?;
        self.print_cond(&stat.lock)?;
        self.print(" ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_try(&mut self, stat: &Try) -> io::Result<()> {
        self.print("try ")?;
        if !stat.resources.is_empty() {
            self.print("(")?;
            self.print_exprs_sep(&stat.resources, "; ")?;
            self.print(") ")?;
        }
        self.print_stat(&stat.body)?;
        for catcher in stat.catchers.trees() {
            self.print(" ")?;
            self.print_stat(&catcher)?;
        }
        if let Some(finalizer) = &stat.finalizer {
            self.print(" finally ")?;
            self.print_stat(finalizer)?;
        }
        Ok(())
    }

    pub(super) fn visit_catch(&mut self, stat: &Catch) -> io::Result<()> {
        self.print("catch (")?;
        self.print_expr(&stat.param, prec::NONE)?;
        self.print(") ")?;
        self.print_stat(&stat.body)
    }

    pub(super) fn visit_if(&mut self, stat: &If) -> io::Result<()> {
        self.print("if ")?;
        self.print_cond(&stat.cond)?;
        self.print(" ")?;
        self.print_stat(&stat.then_part)?;
        if let Some(else_part) = &stat.else_part {
            self.print(" else ")?;
            self.print_stat(else_part)?;
        }
        Ok(())
    }

    pub(super) fn visit_exec(&mut self, stat: &ExpressionStatement) -> io::Result<()> {
        if is_implicit_super_call(&stat.expr) {
            return Ok(());
        }
        let statement = self.prec == prec::NOT_EXPRESSION;
        self.print_expr(&stat.expr, prec::NONE)?;
        if statement {
            self.print(";")?;
        }
        Ok(())
    }

    pub(super) fn visit_jump(&mut self, keyword: &str, label: Option<&str>) -> io::Result<()> {
        self.print(keyword)?;
        if let Some(label) = label {
            self.print(" ")?;
            self.print(label)?;
        }
        self.print(";")
    }

    pub(super) fn visit_return(&mut self, stat: &Return) -> io::Result<()> {
        self.print("return")?;
        if let Some(expr) = &stat.expr {
            self.print(" ")?;
            self.print_expr(expr, prec::NONE)?;
        }
        self.print(";")
    }

    pub(super) fn visit_throw(&mut self, stat: &Throw) -> io::Result<()> {
        self.print("throw ")?;
        self.print_expr(&stat.expr, prec::NONE)?;
        self.print(";")
    }

    pub(super) fn visit_assert(&mut self, stat: &Assert) -> io::Result<()> {
        self.print("assert ")?;
        self.print_expr(&stat.cond, prec::NONE)?;
        if let Some(detail) = &stat.detail {
            self.print(" : ")?;
            self.print_expr(detail, prec::NONE)?;
        }
        self.print(";")
    }
}
