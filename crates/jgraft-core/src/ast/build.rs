use super::{AstKind, JavaAst, JavaNode, NodeId};
use crate::error::JGraftError;
use crate::host::{FieldValue, Tree, TreeKey, TreeKind};
use crate::Result;
use tracing::trace;

fn mismatch(expected: &str, host: &Tree) -> JGraftError {
    JGraftError::structural_error(format!(
        "expected {expected}, found {}",
        host.kind_name()
    ))
}

impl JavaAst {
    /// Wrap `host` as a node of `kind`, recursing into its children
    ///
    /// Returns `None` when the host node is already wrapped. A `kind` that
    /// does not fit the host node is a structural error.
    pub fn build_tree(&mut self, host: &Tree, kind: AstKind) -> Result<Option<NodeId>> {
        match kind {
            AstKind::CompilationUnit => self.build_unit(host),
            AstKind::Type => self.build_type(host),
            AstKind::Field | AstKind::Local | AstKind::Argument => self.build_variable(host, kind),
            AstKind::Initializer => self.build_initializer(host),
            AstKind::Method => self.build_method(host),
            AstKind::Statement => self.build_statement_or_expression(host),
            AstKind::Annotation => self.build_annotation(host, false),
        }
    }

    /// Check that `host` can be wrapped as a fresh node of `kind`
    ///
    /// Mirrors the checks `build_tree` makes before it records anything.
    pub(super) fn check_fresh(&self, host: &Tree, kind: AstKind) -> Result<()> {
        let expected = match kind {
            AstKind::CompilationUnit => Some(("CompilationUnit", "a compilation unit")),
            AstKind::Type => Some(("ClassDecl", "a type declaration")),
            AstKind::Field | AstKind::Local | AstKind::Argument => {
                Some(("VariableDecl", "a variable declaration"))
            }
            AstKind::Initializer => Some(("Block", "an initializer block")),
            AstKind::Method => Some(("MethodDecl", "a method declaration")),
            AstKind::Annotation => Some(("Annotation", "an annotation")),
            AstKind::Statement => None,
        };
        match expected {
            Some((name, description)) if host.kind_name() != name => {
                return Err(mismatch(description, host));
            }
            None if host.kind_name() == "Annotation" => {
                return Err(mismatch("a statement or expression", host));
            }
            _ => {}
        }
        if self.already_handled(host) {
            return Err(JGraftError::structural_error(format!(
                "{} is already part of the graph",
                host.kind_name()
            )));
        }
        Ok(())
    }

    fn already_handled(&self, host: &Tree) -> bool {
        self.handled.contains(&TreeKey::new(host))
    }

    fn put(&mut self, kind: AstKind, host: &Tree, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(JavaNode {
            kind,
            host: host.clone(),
            children,
            parent: None,
            changed: false,
        });
        self.node_map.insert(TreeKey::new(host), id);
        id
    }

    fn push_built(children: &mut Vec<NodeId>, built: Option<NodeId>) {
        if let Some(id) = built {
            children.push(id);
        }
    }

    fn annotations_of(mods: &Tree) -> Vec<Tree> {
        match &*mods.kind() {
            TreeKind::Modifiers(mods) => mods.annotations.trees(),
            _ => Vec::new(),
        }
    }

    fn build_unit(&mut self, host: &Tree) -> Result<Option<NodeId>> {
        if self.already_handled(host) {
            return Ok(None);
        }
        let defs = match &*host.kind() {
            TreeKind::CompilationUnit(unit) => unit.defs.trees(),
            _ => return Err(mismatch("a compilation unit", host)),
        };
        self.handled.insert(TreeKey::new(host));

        let mut children = Vec::new();
        for def in defs {
            if def.kind_name() == "ClassDecl" {
                let built = self.build_type(&def)?;
                Self::push_built(&mut children, built);
            }
        }
        Ok(Some(self.put(AstKind::CompilationUnit, host, children)))
    }

    fn build_type(&mut self, host: &Tree) -> Result<Option<NodeId>> {
        if self.already_handled(host) {
            return Ok(None);
        }
        let (annotations, defs) = match &*host.kind() {
            TreeKind::ClassDecl(class) => (Self::annotations_of(&class.mods), class.defs.trees()),
            _ => return Err(mismatch("a type declaration", host)),
        };
        self.handled.insert(TreeKey::new(host));

        let mut children = Vec::new();
        for annotation in &annotations {
            let built = self.build_annotation(annotation, false)?;
            Self::push_built(&mut children, built);
        }
        for def in &defs {
            let kind = match def.kind_name() {
                "ClassDecl" => AstKind::Type,
                "MethodDecl" => AstKind::Method,
                "VariableDecl" => AstKind::Field,
                "Block" => AstKind::Initializer,
                _ => continue,
            };
            let built = self.build_tree(def, kind)?;
            Self::push_built(&mut children, built);
        }
        Ok(Some(self.put(AstKind::Type, host, children)))
    }

    fn build_variable(&mut self, host: &Tree, kind: AstKind) -> Result<Option<NodeId>> {
        if self.already_handled(host) {
            return Ok(None);
        }
        let (annotations, init) = match &*host.kind() {
            TreeKind::VariableDecl(var) => (Self::annotations_of(&var.mods), var.init.clone()),
            _ => return Err(mismatch("a variable declaration", host)),
        };
        self.handled.insert(TreeKey::new(host));

        let mut children = Vec::new();
        for annotation in &annotations {
            let built = self.build_annotation(annotation, true)?;
            Self::push_built(&mut children, built);
        }
        if let Some(init) = init {
            let built = self.build_statement_or_expression(&init)?;
            Self::push_built(&mut children, built);
        }
        Ok(Some(self.put(kind, host, children)))
    }

    fn build_initializer(&mut self, host: &Tree) -> Result<Option<NodeId>> {
        if self.already_handled(host) {
            return Ok(None);
        }
        let stats = match &*host.kind() {
            TreeKind::Block(block) => block.stats.trees(),
            _ => return Err(mismatch("an initializer block", host)),
        };
        self.handled.insert(TreeKey::new(host));

        let mut children = Vec::new();
        for stat in &stats {
            let built = self.build_statement_or_expression(stat)?;
            Self::push_built(&mut children, built);
        }
        Ok(Some(self.put(AstKind::Initializer, host, children)))
    }

    fn build_method(&mut self, host: &Tree) -> Result<Option<NodeId>> {
        if self.already_handled(host) {
            return Ok(None);
        }
        let (annotations, params, body) = match &*host.kind() {
            TreeKind::MethodDecl(method) => (
                Self::annotations_of(&method.mods),
                method.params.trees(),
                method.body.clone(),
            ),
            _ => return Err(mismatch("a method declaration", host)),
        };
        self.handled.insert(TreeKey::new(host));

        let mut children = Vec::new();
        for annotation in &annotations {
            let built = self.build_annotation(annotation, false)?;
            Self::push_built(&mut children, built);
        }
        for param in &params {
            let built = self.build_variable(param, AstKind::Argument)?;
            Self::push_built(&mut children, built);
        }
        // abstract and interface methods have no statements
        let stats = body
            .map(|body| match &*body.kind() {
                TreeKind::Block(block) => block.stats.trees(),
                _ => Vec::new(),
            })
            .unwrap_or_default();
        for stat in &stats {
            let built = self.build_statement_or_expression(stat)?;
            Self::push_built(&mut children, built);
        }
        Ok(Some(self.put(AstKind::Method, host, children)))
    }

    /// Annotations are leaves
    ///
    /// Inside a variable, an annotation already owned by another wrapper is
    /// skipped: `@A int a, b;` shares one annotation between two fields.
    fn build_annotation(&mut self, host: &Tree, var_context: bool) -> Result<Option<NodeId>> {
        if host.kind_name() != "Annotation" {
            return Err(mismatch("an annotation", host));
        }
        let key = TreeKey::new(host);
        if var_context {
            if self.node_map.contains_key(&key) {
                return Ok(None);
            }
        } else if self.handled.contains(&key) {
            return Ok(None);
        }
        self.handled.insert(key);
        Ok(Some(self.put(AstKind::Annotation, host, Vec::new())))
    }

    /// Generic walk over statements and expressions through the field table
    fn build_statement_or_expression(&mut self, host: &Tree) -> Result<Option<NodeId>> {
        match host.kind_name() {
            "Annotation" => return Ok(None),
            "ClassDecl" => return self.build_type(host),
            "VariableDecl" => return self.build_variable(host, AstKind::Local),
            _ => {}
        }
        if self.already_handled(host) {
            trace!("Skipping aliased {} node", host.kind_name());
            return Ok(None);
        }
        self.handled.insert(TreeKey::new(host));

        let fields = host.kind().fields();
        let mut children = Vec::new();
        for field in fields {
            match field.value {
                FieldValue::Tree(Some(child)) => {
                    let built = self.build_statement_or_expression(&child)?;
                    Self::push_built(&mut children, built);
                }
                FieldValue::Tree(None) => {}
                FieldValue::List(list) => {
                    for child in list.trees() {
                        let built = self.build_statement_or_expression(&child)?;
                        Self::push_built(&mut children, built);
                    }
                }
            }
        }
        Ok(Some(self.put(AstKind::Statement, host, children)))
    }
}
