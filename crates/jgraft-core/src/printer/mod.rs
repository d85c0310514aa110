//! Comment-interleaving Java printer
//!
//! Walks a host tree and writes Java source, merging the captured comment
//! stream back in. Each comment carries how it was attached to the text
//! around it (see [`crate::comments`]); the printer turns those connections
//! into pending line breaks, alignment and spaces, applied lazily on the next
//! write. Parentheses come from a precedence context: a subexpression is
//! wrapped when its own precedence is lower than what its position requires.
//!
//! ```rust,no_run
//! use jgraft_core::frontend::JavaParser;
//! use jgraft_core::printer::{self, PrinterOptions};
//! use jgraft_core::comments::scan_comments;
//!
//! # fn main() -> jgraft_core::Result<()> {
//! let source = "class A {\n\t// kept\n\tint x;\n}\n";
//! let parsed = JavaParser::new()?.parse("A.java", source)?;
//! let comments = scan_comments(source);
//! let text = printer::print_to_string(&parsed.unit, &comments, &PrinterOptions::default())?;
//! print!("{text}");
//! # Ok(())
//! # }
//! ```

mod declarations;
mod expressions;
mod normalize;
mod options;
mod statements;

pub use normalize::normalize;
pub use options::{HEADER_PREFIX, PrinterOptions};

use crate::comments::{CommentToken, EndConnection, StartConnection};
use crate::error::JGraftError;
use crate::host::{Flags, NodeList, Tree, TreeKind, prec};
use crate::Result;
use biome_text_size::TextSize;
use std::io::{self, Write};
use tracing::trace;

/// Print `unit` with default options
pub fn print<W: Write>(unit: &Tree, comments: &[CommentToken], sink: &mut W) -> Result<()> {
    print_with_options(unit, comments, &PrinterOptions::default(), sink)
}

pub fn print_with_options<W: Write>(
    unit: &Tree,
    comments: &[CommentToken],
    options: &PrinterOptions,
    sink: &mut W,
) -> Result<()> {
    let mut printer = Printer::new(sink, comments, options);
    printer.print_unit(unit).map_err(JGraftError::print_error)?;
    printer.out.flush().map_err(JGraftError::print_error)
}

pub fn print_to_string(
    unit: &Tree,
    comments: &[CommentToken],
    options: &PrinterOptions,
) -> Result<String> {
    let mut buffer = Vec::new();
    print_with_options(unit, comments, options, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| JGraftError::print_error(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Streaming printer over one compilation unit
pub struct Printer<'a, W: Write> {
    out: &'a mut W,
    options: &'a PrinterOptions,
    comments: &'a [CommentToken],
    next_comment: usize,

    /// Indentation depth
    lmargin: usize,
    /// Precedence the current position requires
    prec: i32,

    on_new_line: bool,
    aligned: bool,
    needs_space: bool,
    needs_new_line: bool,
    needs_align: bool,
    in_params: bool,

    /// Name printed for constructors; `None` inside anonymous bodies
    encl_class_name: Option<String>,
    /// Directly inside an interface body, where some modifiers are implicit
    in_interface: bool,
}

impl<'a, W: Write> Printer<'a, W> {
    pub fn new(out: &'a mut W, comments: &'a [CommentToken], options: &'a PrinterOptions) -> Self {
        Self {
            out,
            options,
            comments,
            next_comment: 0,
            lmargin: 0,
            prec: prec::NOT_EXPRESSION,
            on_new_line: true,
            aligned: false,
            needs_space: false,
            needs_new_line: false,
            needs_align: false,
            in_params: false,
            encl_class_name: None,
            in_interface: false,
        }
    }

    // ---- output state ----

    fn raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Write `text`, first settling pending line breaks, alignment and spaces
    fn print(&mut self, text: &str) -> io::Result<()> {
        let align = self.needs_align;
        if self.needs_new_line && !self.on_new_line {
            self.println()?;
        }
        if align && !self.aligned {
            self.align()?;
        }
        if self.needs_space && !self.on_new_line && !self.aligned {
            self.raw(" ")?;
        }
        self.needs_space = false;
        self.raw(text)?;
        self.on_new_line = false;
        self.aligned = false;
        Ok(())
    }

    fn println(&mut self) -> io::Result<()> {
        self.on_new_line = true;
        self.aligned = false;
        self.needs_new_line = false;
        let separator = self.options.line_separator.clone();
        self.raw(&separator)
    }

    fn align(&mut self) -> io::Result<()> {
        self.on_new_line = false;
        self.aligned = true;
        self.needs_align = false;
        let indent = self.options.indent.repeat(self.lmargin);
        self.raw(&indent)
    }

    fn indent(&mut self) {
        self.lmargin += 1;
    }

    fn undent(&mut self) {
        self.lmargin = self.lmargin.saturating_sub(1);
    }

    fn open(&mut self, context: i32, own: i32) -> io::Result<()> {
        if own < context {
            self.print("(")?;
        }
        Ok(())
    }

    fn close(&mut self, context: i32, own: i32) -> io::Result<()> {
        if own < context {
            self.print(")")?;
        }
        Ok(())
    }

    // ---- comments ----

    /// Print every pending comment that starts before `till`
    fn consume_comments(&mut self, till: TextSize) -> io::Result<()> {
        let comments = self.comments;
        let prev_new_line = self.on_new_line;
        while let Some(comment) = comments.get(self.next_comment) {
            if comment.position >= till {
                break;
            }
            self.next_comment += 1;
            self.print_comment(comment)?;
        }
        if !self.on_new_line && prev_new_line {
            self.println()?;
        }
        Ok(())
    }

    /// Print comments glued to the end of the node that ended at `from`
    fn consume_trailing_comments(&mut self, mut from: TextSize) -> io::Result<()> {
        let comments = self.comments;
        let prev_new_line = self.on_new_line;
        let mut stop = false;
        while let Some(comment) = comments.get(self.next_comment) {
            let detached = matches!(
                comment.start_connection,
                StartConnection::OnNextLine | StartConnection::StartOfLine
            );
            if stop || detached || comment.prev_end_position != from {
                break;
            }
            self.next_comment += 1;
            from = comment.end_position;
            self.print_comment(comment)?;
            stop = comment.end_connection == EndConnection::OnNextLine;
        }
        if !self.on_new_line && prev_new_line {
            self.println()?;
        }
        Ok(())
    }

    /// Comments inside erroneous text are part of that text
    fn skip_comments(&mut self, till: TextSize) {
        while self
            .comments
            .get(self.next_comment)
            .is_some_and(|comment| comment.position < till)
        {
            self.next_comment += 1;
        }
    }

    fn print_comment(&mut self, comment: &CommentToken) -> io::Result<()> {
        trace!(
            "Comment at {:?}: {:?}/{:?}",
            comment.position, comment.start_connection, comment.end_connection
        );
        match comment.start_connection {
            StartConnection::DirectlyAfterPrevious => self.needs_space = false,
            StartConnection::AfterPrevious => self.needs_space = true,
            StartConnection::StartOfLine => {
                self.needs_new_line = true;
                self.needs_align = false;
            }
            StartConnection::OnNextLine => {
                if !self.aligned {
                    self.needs_new_line = true;
                    self.needs_align = true;
                }
            }
        }

        self.print(&comment.content)?;

        match comment.end_connection {
            EndConnection::OnNextLine => {
                if !self.aligned {
                    self.needs_new_line = true;
                    self.needs_align = true;
                }
            }
            EndConnection::AfterComment => self.needs_space = true,
            EndConnection::DirectlyAfterComment => {}
        }
        Ok(())
    }

    // ---- tree helpers ----

    /// Print `tree` in precedence context `context`, with its comments
    fn print_expr(&mut self, tree: &Tree, context: i32) -> io::Result<()> {
        let saved = self.prec;
        self.prec = context;
        let span = tree.span();
        if let Some(span) = span {
            self.consume_comments(span.start())?;
        }
        self.visit(tree)?;
        if let Some(span) = span {
            self.consume_trailing_comments(span.end())?;
        }
        self.prec = saved;
        Ok(())
    }

    fn print_opt(&mut self, tree: Option<&Tree>, context: i32) -> io::Result<()> {
        match tree {
            Some(tree) => self.print_expr(tree, context),
            None => self.print("/*missing*/"),
        }
    }

    fn print_stat(&mut self, tree: &Tree) -> io::Result<()> {
        let empty_synthetic = matches!(
            &*tree.kind(),
            TreeKind::Block(block) if block.flags.contains(Flags::SYNTHETIC) && block.stats.is_empty()
        );
        if empty_synthetic {
            return Ok(());
        }
        self.print_expr(tree, prec::NOT_EXPRESSION)
    }

    fn print_exprs_sep(&mut self, trees: &NodeList, separator: &str) -> io::Result<()> {
        for (i, tree) in trees.trees().iter().enumerate() {
            if i > 0 {
                self.print(separator)?;
            }
            self.print_expr(tree, prec::NONE)?;
        }
        Ok(())
    }

    fn print_exprs(&mut self, trees: &NodeList) -> io::Result<()> {
        self.print_exprs_sep(trees, ", ")
    }

    fn print_stats(&mut self, stats: &NodeList) -> io::Result<()> {
        for stat in stats.trees() {
            self.align()?;
            self.print_stat(&stat)?;
            self.println()?;
        }
        Ok(())
    }

    fn print_type_args(&mut self, args: &NodeList) -> io::Result<()> {
        if !args.is_empty() {
            self.print("<")?;
            self.print_exprs(args)?;
            self.print(">")?;
        }
        Ok(())
    }

    /// `{`, the statements one per line, then comments up to the end of
    /// `container`, then `}`
    fn print_block(&mut self, stats: &NodeList, container: &Tree) -> io::Result<()> {
        self.print("{")?;
        self.println()?;
        self.indent();
        self.print_stats(stats)?;
        if let Some(end) = container.end() {
            self.consume_comments(end)?;
        }
        self.undent();
        self.align()?;
        self.print("}")
    }

    fn visit(&mut self, tree: &Tree) -> io::Result<()> {
        let kind = tree.kind().clone();
        match &kind {
            TreeKind::CompilationUnit(unit) => self.visit_unit(unit),
            TreeKind::PackageDecl(package) => self.visit_package(package),
            TreeKind::Import(import) => self.visit_import(import),
            TreeKind::ClassDecl(class) => self.visit_class(tree, class),
            TreeKind::MethodDecl(method) => self.visit_method(method),
            TreeKind::VariableDecl(var) => self.visit_var(var),
            TreeKind::Modifiers(mods) => self.print_modifiers(mods.flags, &mods.annotations),
            TreeKind::TypeParameter(param) => self.visit_type_parameter(param),
            TreeKind::Annotation(annotation) => self.visit_annotation(annotation),

            TreeKind::Block(block) => self.visit_block(tree, block),
            TreeKind::Skip(_) => self.print(";"),
            TreeKind::DoWhileLoop(stat) => self.visit_do_while(stat),
            TreeKind::WhileLoop(stat) => self.visit_while(stat),
            TreeKind::ForLoop(stat) => self.visit_for(stat),
            TreeKind::EnhancedForLoop(stat) => self.visit_foreach(stat),
            TreeKind::LabeledStatement(stat) => self.visit_labeled(stat),
            TreeKind::Switch(stat) => self.visit_switch(stat),
            TreeKind::Case(stat) => self.visit_case(stat),
            TreeKind::Synchronized(stat) => self.visit_synchronized(stat),
            TreeKind::Try(stat) => self.visit_try(stat),
            TreeKind::Catch(stat) => self.visit_catch(stat),
            TreeKind::If(stat) => self.visit_if(stat),
            TreeKind::ExpressionStatement(stat) => self.visit_exec(stat),
            TreeKind::Break(stat) => self.visit_jump("break", stat.label.as_deref()),
            TreeKind::Continue(stat) => self.visit_jump("continue", stat.label.as_deref()),
            TreeKind::Return(stat) => self.visit_return(stat),
            TreeKind::Throw(stat) => self.visit_throw(stat),
            TreeKind::Assert(stat) => self.visit_assert(stat),

            TreeKind::Conditional(expr) => self.visit_conditional(expr),
            TreeKind::MethodInvocation(expr) => self.visit_apply(expr),
            TreeKind::NewClass(expr) => self.visit_new_class(expr),
            TreeKind::NewArray(expr) => self.visit_new_array(expr),
            TreeKind::Parens(expr) => self.visit_parens(expr),
            TreeKind::Assign(expr) => self.visit_assign(expr),
            TreeKind::AssignOp(expr) => self.visit_assign_op(expr),
            TreeKind::Unary(expr) => self.visit_unary(expr),
            TreeKind::Binary(expr) => self.visit_binary(expr),
            TreeKind::TypeCast(expr) => self.visit_type_cast(expr),
            TreeKind::InstanceOf(expr) => self.visit_instance_of(expr),
            TreeKind::ArrayAccess(expr) => self.visit_indexed(expr),
            TreeKind::FieldAccess(expr) => self.visit_select(expr),
            TreeKind::Ident(expr) => self.print(&expr.name),
            TreeKind::Literal(expr) => self.visit_literal(expr),
            TreeKind::Lambda(expr) => self.visit_lambda(expr),
            TreeKind::MemberReference(expr) => self.visit_reference(expr),

            TreeKind::PrimitiveType(ty) => self.print(ty.kind.as_str()),
            TreeKind::ArrayType(ty) => {
                self.print_expr(&ty.elemtype, prec::NONE)?;
                self.print("[]")
            }
            TreeKind::TypeApply(ty) => {
                self.print_expr(&ty.clazz, prec::NONE)?;
                self.print("<")?;
                self.print_exprs(&ty.arguments)?;
                self.print(">")
            }
            TreeKind::Wildcard(ty) => {
                self.print(ty.kind.prefix())?;
                match &ty.inner {
                    Some(inner) => self.print_expr(inner, prec::NONE),
                    None => Ok(()),
                }
            }
            TreeKind::TypeUnion(ty) => self.print_exprs_sep(&ty.alternatives, " | "),
            TreeKind::Erroneous(err) => {
                if let Some(end) = tree.end() {
                    self.skip_comments(end);
                }
                if err.text.is_empty() {
                    self.print("(ERROR)")
                } else {
                    self.print(&err.text)
                }
            }
        }
    }
}

/// Java source escapes for a string or char literal body
///
/// Only the delimiter of the enclosing literal is escaped among the quotes.
/// Control characters become `\uXXXX`; other characters are written as is.
pub fn quote(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' | '\'' if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}
