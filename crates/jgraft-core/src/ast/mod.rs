//! Navigable node graph over a host compilation unit
//!
//! The host tree has no parent links and no notion of which nodes are
//! declarations. [`JavaAst`] walks a unit once and wraps every semantically
//! distinct host node in a [`JavaNode`] with a kind, a parent and ordered
//! children. Wrappers live in an arena and are addressed by [`NodeId`].
//!
//! # Example
//!
//! ```rust,no_run
//! use jgraft_core::ast::{AstKind, JavaAst};
//! use jgraft_core::frontend::JavaParser;
//!
//! let mut parser = JavaParser::new()?;
//! let parsed = parser.parse("A.java", "class A { int x = 1; }")?;
//! let ast = JavaAst::build(&parsed.unit)?;
//!
//! let class = ast.down(ast.top())[0];
//! assert_eq!(ast.kind(class), AstKind::Type);
//! assert_eq!(ast.name(class).as_deref(), Some("A"));
//! # Ok::<(), jgraft_core::JGraftError>(())
//! ```

mod build;
mod visitor;

pub use visitor::{AstVisitor, DumpVisitor};

use crate::diagnostics::{DiagnosticCoordinator, DiagnosticRange};
use crate::error::JGraftError;
use crate::host::{DiagnosticHost, DiagnosticKind, Tree, TreeKey, TreeKind};
use crate::splice::{self, SpliceSite};
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Index of a wrapper node inside its [`JavaAst`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a wrapper node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstKind {
    CompilationUnit,
    Type,
    Field,
    Initializer,
    Method,
    Argument,
    Local,
    Statement,
    Annotation,
}

impl fmt::Display for AstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AstKind::CompilationUnit => "COMPILATION_UNIT",
            AstKind::Type => "TYPE",
            AstKind::Field => "FIELD",
            AstKind::Initializer => "INITIALIZER",
            AstKind::Method => "METHOD",
            AstKind::Argument => "ARGUMENT",
            AstKind::Local => "LOCAL",
            AstKind::Statement => "STATEMENT",
            AstKind::Annotation => "ANNOTATION",
        };
        f.write_str(name)
    }
}

/// One wrapper node
#[derive(Debug, Clone)]
pub struct JavaNode {
    kind: AstKind,
    host: Tree,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    changed: bool,
}

impl JavaNode {
    pub fn kind(&self) -> AstKind {
        self.kind
    }

    pub fn host(&self) -> &Tree {
        &self.host
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }
}

/// The wrapper graph of one compilation unit
///
/// Nodes detached by [`JavaAst::replace`] stay in the arena, unreachable
/// from the root, until the graph is dropped.
pub struct JavaAst {
    nodes: Vec<JavaNode>,
    top: NodeId,
    handled: HashSet<TreeKey>,
    node_map: HashMap<TreeKey, NodeId>,
    source_name: String,
    package: Option<Tree>,
    imports: Vec<Tree>,
}

impl JavaAst {
    /// Build the graph for a host compilation unit
    pub fn build(unit: &Tree) -> Result<Self> {
        let (source_name, package, imports) = match &*unit.kind() {
            TreeKind::CompilationUnit(cu) => (
                cu.source_file.clone(),
                cu.package.clone(),
                cu.defs
                    .trees()
                    .into_iter()
                    .filter(|def| def.kind_name() == "Import")
                    .collect(),
            ),
            other => {
                return Err(JGraftError::structural_error(format!(
                    "expected a compilation unit, found {}",
                    other.name()
                )));
            }
        };

        let mut ast = JavaAst {
            nodes: Vec::new(),
            top: NodeId(0),
            handled: HashSet::new(),
            node_map: HashMap::new(),
            source_name,
            package,
            imports,
        };
        ast.top = ast
            .build_tree(unit, AstKind::CompilationUnit)?
            .ok_or_else(|| JGraftError::internal_error("compilation unit was already wrapped"))?;
        debug!(
            "Built graph for {} with {} nodes",
            ast.source_name,
            ast.nodes.len()
        );
        Ok(ast)
    }

    /// Wrap `host` again; host nodes that are already wrapped are skipped
    pub fn rebuild(&mut self) -> Result<()> {
        let unit = self.host(self.top).clone();
        self.build_tree(&unit, AstKind::CompilationUnit)?;
        Ok(())
    }

    pub fn top(&self) -> NodeId {
        self.top
    }

    pub fn get(&self, id: NodeId) -> &JavaNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> AstKind {
        self.get(id).kind
    }

    pub fn host(&self, id: NodeId) -> &Tree {
        &self.get(id).host
    }

    /// Parent node, `None` for the root
    pub fn up(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Children in source order
    pub fn down(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Nearest ancestor (or `id` itself) of the given kind
    pub fn up_to_kind(&self, id: NodeId, kind: AstKind) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.kind(current) == kind {
                return Some(current);
            }
            cursor = self.up(current);
        }
        None
    }

    /// Wrapper of a host node, if it has one
    pub fn node_for(&self, host: &Tree) -> Option<NodeId> {
        self.node_map.get(&TreeKey::new(host)).copied()
    }

    /// Declared name of types, members, variables and the unit's file name
    pub fn name(&self, id: NodeId) -> Option<String> {
        match &*self.host(id).kind() {
            TreeKind::CompilationUnit(cu) => Some(cu.source_file.clone()),
            TreeKind::ClassDecl(class) => Some(class.name.clone()),
            TreeKind::MethodDecl(method) => Some(method.name.clone()),
            TreeKind::VariableDecl(var) => Some(var.name.clone()),
            _ => None,
        }
    }

    pub fn compilation_unit(&self) -> &Tree {
        self.host(self.top)
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn package_declaration(&self) -> Option<&Tree> {
        self.package.as_ref()
    }

    pub fn imports(&self) -> &[Tree] {
        &self.imports
    }

    pub fn is_changed(&self, id: NodeId) -> bool {
        self.get(id).changed
    }

    /// Number of wrappers in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn mark_changed(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            self.nodes[current.0].changed = true;
            cursor = self.nodes[current.0].parent;
        }
    }

    /// Wrap a freshly inserted host node and attach it under `parent`
    pub fn add(&mut self, parent: NodeId, host: &Tree, kind: AstKind) -> Result<Option<NodeId>> {
        let Some(id) = self.build_tree(host, kind)? else {
            return Ok(None);
        };
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        self.mark_changed(id);
        Ok(Some(id))
    }

    /// Swap the host node of `id` for `replacement`
    ///
    /// The replacement is checked against the node's kind first; then the
    /// host tree is spliced and the wrapper subtree is rebuilt for the new
    /// host in the old node's place among its siblings. Either every step
    /// happens or the host tree and the graph are left as they were.
    /// Returns the id of the new wrapper.
    pub fn replace(&mut self, id: NodeId, replacement: &Tree) -> Result<NodeId> {
        let parent = self
            .up(id)
            .ok_or_else(|| JGraftError::structural_error("cannot replace the compilation unit"))?;
        let kind = self.kind(id);
        let old = self.host(id).clone();
        let holder = self.host(parent).clone();
        self.check_fresh(replacement, kind)?;

        let site = SpliceSite::locate(&holder, &old).ok_or_else(|| {
            JGraftError::splice_error(
                "",
                format!(
                    "{} is not reachable from its parent {}",
                    old.kind_name(),
                    holder.kind_name()
                ),
            )
        })?;
        if !splice::replace(&site, &old, replacement)? {
            return Err(JGraftError::splice_error(
                site.field(),
                format!("{} is no longer in its slot", old.kind_name()),
            ));
        }

        let saved = (self.nodes.len(), self.handled.clone(), self.node_map.clone());
        self.forget(id);
        let new_id = match self.build_tree(replacement, kind) {
            Ok(Some(new_id)) => new_id,
            outcome => {
                let (len, handled, node_map) = saved;
                self.nodes.truncate(len);
                self.handled = handled;
                self.node_map = node_map;
                self.restore_host(&holder, replacement, &old);
                return Err(outcome.err().unwrap_or_else(|| {
                    JGraftError::structural_error("replacement node is already part of the graph")
                }));
            }
        };

        self.nodes[new_id.0].parent = Some(parent);
        self.nodes[id.0].parent = None;
        if let Some(slot) = self.nodes[parent.0]
            .children
            .iter_mut()
            .find(|child| **child == id)
        {
            *slot = new_id;
        }
        self.mark_changed(new_id);
        debug!(
            "Replaced {} node in {} ({} -> {})",
            kind,
            self.source_name,
            old.kind_name(),
            replacement.kind_name()
        );
        Ok(new_id)
    }

    /// Put `old` back where `replacement` was spliced in
    fn restore_host(&self, holder: &Tree, replacement: &Tree, old: &Tree) {
        let restored = SpliceSite::locate(holder, replacement)
            .map(|site| splice::replace(&site, replacement, old));
        if !matches!(restored, Some(Ok(true))) {
            warn!(
                "Could not put {} back into {}",
                old.kind_name(),
                holder.kind_name()
            );
        }
    }

    /// Drop the identity bookkeeping of a detached subtree
    fn forget(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let key = TreeKey::new(&self.nodes[current.0].host);
            self.handled.remove(&key);
            if self.node_map.get(&key) == Some(&current) {
                self.node_map.remove(&key);
            }
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }

    /// Depth-first traversal in source order
    pub fn traverse<V: AstVisitor + ?Sized>(&self, visitor: &mut V) {
        self.traverse_node(self.top, visitor);
    }

    pub fn traverse_node<V: AstVisitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        visitor::dispatch(self, id, visitor);
    }

    /// Indented outline of the graph
    pub fn dump(&self) -> String {
        let mut dumper = DumpVisitor::new();
        self.traverse(&mut dumper);
        dumper.into_output()
    }

    fn report<H: DiagnosticHost + ?Sized>(
        &self,
        host: &H,
        id: NodeId,
        kind: DiagnosticKind,
        message: &str,
    ) {
        let range = DiagnosticRange::of(self.host(id));
        let coordinator = DiagnosticCoordinator::new(host, self.source_name.clone());
        let suppress = if kind == DiagnosticKind::Error {
            range
        } else {
            None
        };
        coordinator.report(kind, message, range.map(|r| r.start), suppress);
    }

    /// Report an error at a node, dropping stale queued diagnostics inside it
    pub fn add_error<H: DiagnosticHost + ?Sized>(&self, host: &H, id: NodeId, message: &str) {
        self.report(host, id, DiagnosticKind::Error, message);
    }

    pub fn add_warning<H: DiagnosticHost + ?Sized>(&self, host: &H, id: NodeId, message: &str) {
        self.report(host, id, DiagnosticKind::Warning, message);
    }
}

impl fmt::Debug for JavaAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaAst")
            .field("source_name", &self.source_name)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
