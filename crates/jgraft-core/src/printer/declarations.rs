use super::Printer;
use crate::host::{
    Annotation, ClassDecl, CompilationUnit, Flags, Import, MethodDecl, NodeList, PackageDecl, Tree,
    TreeKind, TypeParameter, VariableDecl, prec,
};
use biome_text_size::TextSize;
use std::io::{self, Write};

/// Flags and annotations of a `Modifiers` node
fn modifiers_of(mods: &Tree) -> (Flags, NodeList) {
    match &*mods.kind() {
        TreeKind::Modifiers(mods) => (mods.flags, mods.annotations.clone()),
        _ => (Flags::empty(), NodeList::new()),
    }
}

fn is_enum_constant(tree: &Tree) -> bool {
    match &*tree.kind() {
        TreeKind::VariableDecl(var) => modifiers_of(&var.mods).0.contains(Flags::ENUM),
        _ => false,
    }
}

fn class_defs(tree: &Tree) -> NodeList {
    match &*tree.kind() {
        TreeKind::ClassDecl(class) => class.defs.clone(),
        _ => NodeList::new(),
    }
}

/// `value = x`, the one argument that prints as `@A(x)`
fn value_shorthand(arg: &Tree) -> Option<Tree> {
    let kind = arg.kind();
    let TreeKind::Assign(assign) = &*kind else {
        return None;
    };
    let is_value = matches!(&*assign.lhs.kind(), TreeKind::Ident(ident) if ident.name == "value");
    is_value.then(|| assign.rhs.clone())
}

impl<W: Write> Printer<'_, W> {
    pub(super) fn print_unit(&mut self, unit: &Tree) -> io::Result<()> {
        if self.options.header {
            let header = self.options.header_line();
            self.print(&header)?;
            self.println()?;
        }
        self.print_stat(unit)
    }

    pub(super) fn visit_unit(&mut self, unit: &CompilationUnit) -> io::Result<()> {
        if let Some(package) = &unit.package {
            self.print_stat(package)?;
            self.println()?;
        }

        let mut first_import = true;
        for def in unit.defs.trees() {
            if def.kind_name() == "Import" {
                if first_import {
                    self.println()?;
                    first_import = false;
                }
                self.print_stat(&def)?;
                self.println()?;
            } else {
                self.print_stat(&def)?;
            }
        }

        self.consume_comments(TextSize::from(u32::MAX))?;
        if !self.on_new_line {
            self.println()?;
        }
        Ok(())
    }

    pub(super) fn visit_package(&mut self, package: &PackageDecl) -> io::Result<()> {
        self.print_annotations(&package.annotations)?;
        self.print("package ")?;
        self.print_expr(&package.pid, prec::NONE)?;
        self.print(";")
    }

    pub(super) fn visit_import(&mut self, import: &Import) -> io::Result<()> {
        self.print("import ")?;
        if import.is_static {
            self.print("static ")?;
        }
        self.print_expr(&import.qualid, prec::NONE)?;
        self.print(";")
    }

    pub(super) fn print_flags(&mut self, flags: Flags) -> io::Result<()> {
        if flags.contains(Flags::SYNTHETIC) {
            self.print("/*synthetic*/ ")?;
        }
        let keywords = flags.keywords();
        if !keywords.is_empty() {
            self.print(&keywords.join(" "))?;
            self.print(" ")?;
        }
        if flags.contains(Flags::ANNOTATION) {
            self.print("@")?;
        }
        Ok(())
    }

    /// Annotations go on their own lines, except among parameters
    pub(super) fn print_annotations(&mut self, annotations: &NodeList) -> io::Result<()> {
        for annotation in annotations.trees() {
            self.print_stat(&annotation)?;
            if self.in_params {
                self.print(" ")?;
            } else {
                self.println()?;
                self.align()?;
            }
        }
        Ok(())
    }

    pub(super) fn print_modifiers(&mut self, flags: Flags, annotations: &NodeList) -> io::Result<()> {
        self.print_annotations(annotations)?;
        self.print_flags(flags)
    }

    pub(super) fn visit_class(&mut self, tree: &Tree, class: &ClassDecl) -> io::Result<()> {
        let (flags, annotations) = modifiers_of(&class.mods);
        let mut shown = flags - Flags::INTERFACE;
        if self.in_interface {
            shown -= Flags::INTERFACE_TYPE_IMPLICIT;
        }

        if let Some(start) = tree.start() {
            self.consume_comments(start)?;
        }
        self.println()?;
        self.align()?;
        self.print_modifiers(shown, &annotations)?;

        if flags.contains(Flags::INTERFACE) {
            self.print("interface ")?;
            self.print(&class.name)?;
            self.print_type_args(&class.typarams)?;
            if !class.implementing.is_empty() {
                self.print(" extends ")?;
                self.print_exprs(&class.implementing)?;
            }
        } else {
            let keyword = if flags.contains(Flags::ENUM) {
                "enum "
            } else {
                "class "
            };
            self.print(keyword)?;
            self.print(&class.name)?;
            self.print_type_args(&class.typarams)?;
            if let Some(extending) = &class.extending {
                self.print(" extends ")?;
                self.print_expr(extending, prec::NONE)?;
            }
            if !class.implementing.is_empty() {
                self.print(" implements ")?;
                self.print_exprs(&class.implementing)?;
            }
        }
        self.print(" ")?;

        let encl_class_name = self.encl_class_name.replace(class.name.clone());
        let in_interface = std::mem::replace(&mut self.in_interface, flags.contains(Flags::INTERFACE));
        let body = if flags.contains(Flags::ENUM) {
            self.print_enum_body(&class.defs, tree)
        } else {
            self.print_block(&class.defs, tree)
        };
        self.encl_class_name = encl_class_name;
        self.in_interface = in_interface;
        body
    }

    /// Constants separated by commas, a `;`, then the other members
    fn print_enum_body(&mut self, defs: &NodeList, container: &Tree) -> io::Result<()> {
        let (constants, members): (Vec<Tree>, Vec<Tree>) =
            defs.trees().into_iter().partition(is_enum_constant);

        self.print("{")?;
        self.println()?;
        self.indent();
        for (i, constant) in constants.iter().enumerate() {
            if i > 0 {
                self.print(",")?;
                self.println()?;
            }
            self.align()?;
            self.print_stat(constant)?;
        }
        if constants.is_empty() {
            self.align()?;
        }
        self.print(";")?;
        self.println()?;
        self.print_stats(&NodeList::from_trees(members))?;
        if let Some(end) = container.end() {
            self.consume_comments(end)?;
        }
        self.undent();
        self.align()?;
        self.print("}")
    }

    fn print_enum_member(&mut self, var: &VariableDecl, annotations: &NodeList) -> io::Result<()> {
        self.print_annotations(annotations)?;
        self.print(&var.name)?;

        let Some(init) = &var.init else {
            return Ok(());
        };
        let TreeKind::NewClass(creation) = init.kind().clone() else {
            return Ok(());
        };
        if !creation.args.is_empty() {
            self.print("(")?;
            self.print_exprs(&creation.args)?;
            self.print(")")?;
        }
        if let Some(def) = &creation.def {
            self.print(" ")?;
            let encl_class_name = self.encl_class_name.take();
            let in_interface = std::mem::replace(&mut self.in_interface, false);
            let body = self.print_block(&class_defs(def), def);
            self.encl_class_name = encl_class_name;
            self.in_interface = in_interface;
            body?;
        }
        Ok(())
    }

    pub(super) fn visit_method(&mut self, method: &MethodDecl) -> io::Result<()> {
        if method.is_constructor() && self.encl_class_name.is_none() {
            return Ok(());
        }
        let (flags, annotations) = modifiers_of(&method.mods);
        if flags.contains(Flags::GENERATED_CONSTRUCTOR) {
            return Ok(());
        }
        let mut shown = flags;
        if self.in_interface {
            shown -= Flags::INTERFACE_METHOD_IMPLICIT;
        }

        self.println()?;
        self.align()?;
        self.print_modifiers(shown, &annotations)?;
        if !method.typarams.is_empty() {
            self.print_type_args(&method.typarams)?;
            self.print(" ")?;
        }
        if method.is_constructor() {
            let name = self.encl_class_name.clone().unwrap_or_default();
            self.print(&name)?;
        } else {
            self.print_opt(method.restype.as_ref(), prec::NONE)?;
            self.print(" ")?;
            self.print(&method.name)?;
        }

        let in_interface = std::mem::replace(&mut self.in_interface, false);
        let rest = self.print_method_rest(method);
        self.in_interface = in_interface;
        rest
    }

    fn print_method_rest(&mut self, method: &MethodDecl) -> io::Result<()> {
        self.print("(")?;
        let in_params = std::mem::replace(&mut self.in_params, true);
        let params = self.print_exprs(&method.params);
        self.in_params = in_params;
        params?;
        self.print(")")?;

        if !method.thrown.is_empty() {
            self.print(" throws ")?;
            self.print_exprs(&method.thrown)?;
        }
        if let Some(default_value) = &method.default_value {
            self.print(" default ")?;
            self.print_expr(default_value, prec::NONE)?;
        }
        match &method.body {
            Some(body) => {
                self.print(" ")?;
                self.print_stat(body)
            }
            None => self.print(";"),
        }
    }

    pub(super) fn visit_var(&mut self, var: &VariableDecl) -> io::Result<()> {
        let (flags, annotations) = modifiers_of(&var.mods);
        if flags.contains(Flags::ENUM) {
            return self.print_enum_member(var, &annotations);
        }
        let mut shown = flags;
        if self.in_interface {
            shown -= Flags::INTERFACE_FIELD_IMPLICIT;
        }

        let in_interface = std::mem::replace(&mut self.in_interface, false);
        let printed = self.print_var_rest(var, flags, shown, &annotations);
        self.in_interface = in_interface;
        printed
    }

    fn print_var_rest(
        &mut self,
        var: &VariableDecl,
        flags: Flags,
        shown: Flags,
        annotations: &NodeList,
    ) -> io::Result<()> {
        let statement = self.prec == prec::NOT_EXPRESSION;
        self.print_modifiers(shown, annotations)?;

        let varargs_elem = match &var.vartype {
            Some(vartype) if flags.contains(Flags::VARARGS) => match &*vartype.kind() {
                TreeKind::ArrayType(array) => Some(array.elemtype.clone()),
                _ => None,
            },
            _ => None,
        };
        match (&var.vartype, varargs_elem) {
            (_, Some(elemtype)) => {
                self.print_expr(&elemtype, prec::NONE)?;
                self.print("... ")?;
            }
            (Some(vartype), None) => {
                self.print_expr(vartype, prec::NONE)?;
                self.print(" ")?;
            }
            (None, None) => {}
        }
        self.print(&var.name)?;

        if let Some(init) = &var.init {
            self.print(" = ")?;
            self.print_expr(init, prec::NONE)?;
        }
        if statement {
            self.print(";")?;
        }
        Ok(())
    }

    pub(super) fn visit_type_parameter(&mut self, param: &TypeParameter) -> io::Result<()> {
        self.print(&param.name)?;
        if !param.bounds.is_empty() {
            self.print(" extends ")?;
            self.print_exprs_sep(&param.bounds, " & ")?;
        }
        Ok(())
    }

    pub(super) fn visit_annotation(&mut self, annotation: &Annotation) -> io::Result<()> {
        self.print("@")?;
        self.print_expr(&annotation.annotation_type, prec::NONE)?;
        let args = annotation.args.trees();
        if args.is_empty() {
            return Ok(());
        }
        self.print("(")?;
        match args.as_slice() {
            [single] => match value_shorthand(single) {
                Some(value) => self.print_expr(&value, prec::NONE)?,
                None => self.print_expr(single, prec::NONE)?,
            },
            _ => self.print_exprs(&annotation.args)?,
        }
        self.print(")")
    }
}
